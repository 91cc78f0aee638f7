//! Shared links: lifecycle, recipient access, auto-delete, and management.

pub mod access;
pub mod lifecycle;
pub mod reaper;
pub mod service;

pub use access::{AccessGate, AccessSession, PinState, PrintReceipt, ViewGrant};
pub use lifecycle::{LinkLifecycle, mark_printed, reconcile, revoke};
pub use reaper::{DeletionHandle, Reaper};
pub use service::{CreateShareRequest, ShareCreated, ShareService};
