//! User settings management.

pub mod service;

pub use service::{SettingsService, UpdateSettingsRequest};
