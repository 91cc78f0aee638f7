//! # prishare-database
//!
//! Repositories for every PriShare record type. Each collection is held
//! as one JSON array under its own store key; all read-modify-write
//! sequences go through [`Database`], which serialises writers.

pub mod collection;
pub mod connection;
pub mod repositories;

pub use connection::Database;
