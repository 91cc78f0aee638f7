//! Link lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a shared link.
///
/// `Active` is the only non-terminal state; every transition leaves it and
/// none ever returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// Usable by its recipient.
    Active,
    /// The single permitted print has happened.
    Printed,
    /// The document's expiry instant passed.
    Expired,
    /// The sender withdrew the link.
    Revoked,
}

impl LinkStatus {
    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Whether the state machine defines a transition from `self` to `next`.
    pub fn can_transition_to(&self, next: LinkStatus) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Printed | Self::Expired | Self::Revoked)
        )
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Printed => "printed",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
