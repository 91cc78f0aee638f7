//! PIN policy enforcement for new shares.

use prishare_core::config::SecurityConfig;
use prishare_core::error::AppError;

/// Validates PINs against the configured policy: digits only, with a
/// bounded length.
#[derive(Debug, Clone)]
pub struct PinValidator {
    /// Minimum PIN length.
    min_length: usize,
    /// Maximum PIN length.
    max_length: usize,
}

impl PinValidator {
    /// Creates a new validator from security configuration.
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            min_length: config.pin_min_length,
            max_length: config.pin_max_length,
        }
    }

    /// Validates a PIN against all configured policies.
    ///
    /// Returns `Ok(())` if the PIN meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, pin: &str) -> Result<(), AppError> {
        if pin.is_empty() || !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::validation("PIN must contain digits only"));
        }

        if pin.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Please enter a PIN of at least {} digits",
                self.min_length
            )));
        }

        if pin.len() > self.max_length {
            return Err(AppError::validation(format!(
                "PIN must be at most {} digits",
                self.max_length
            )));
        }

        Ok(())
    }
}
