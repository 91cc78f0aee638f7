//! # prishare-entity
//!
//! Domain entity models for PriShare. Every struct in this crate is a
//! record persisted in the key-value store or a value object embedded in
//! one. Records serialize with camelCase field names, matching the layout
//! the store has always held.

pub mod access;
pub mod document;
pub mod link;
pub mod settings;
