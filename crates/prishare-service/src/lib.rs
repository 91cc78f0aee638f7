//! # prishare-service
//!
//! Business logic for PriShare: the link lifecycle state machine, the
//! access gate recipients go through, auto-delete, share creation, and
//! settings.
//!
//! Services follow constructor injection. Repositories and the clock are
//! handed in at construction time; [`AppServices`] wires the standard set.

pub mod context;
pub mod error;
pub mod link;
pub mod settings;

pub use context::AppServices;
pub use error::AccessError;
pub use link::{
    AccessGate, AccessSession, CreateShareRequest, DeletionHandle, LinkLifecycle, PinState,
    PrintReceipt, Reaper, ShareCreated, ShareService, ViewGrant,
};
pub use settings::{SettingsService, UpdateSettingsRequest};
