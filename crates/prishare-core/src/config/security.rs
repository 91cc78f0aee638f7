//! PIN policy configuration.

use serde::{Deserialize, Serialize};

/// PIN policy applied when a share is PIN-protected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Minimum number of digits in a PIN.
    #[serde(default = "default_min_length")]
    pub pin_min_length: usize,
    /// Maximum number of digits in a PIN.
    #[serde(default = "default_max_length")]
    pub pin_max_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            pin_min_length: default_min_length(),
            pin_max_length: default_max_length(),
        }
    }
}

fn default_min_length() -> usize {
    4
}

fn default_max_length() -> usize {
    6
}
