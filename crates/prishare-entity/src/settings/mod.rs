//! Per-origin user preferences.

pub mod model;

pub use model::{Theme, UserSettings};
