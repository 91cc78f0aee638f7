//! # prishare-core
//!
//! Core crate for PriShare. Contains the key-value store and repository
//! traits, the injectable clock, configuration schemas, typed identifiers,
//! formatting helpers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other PriShare crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
