//! Core traits defined in `prishare-core` and implemented by other crates.

pub mod clock;
pub mod repository;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use repository::Repository;
pub use store::{KeyValueStore, KeyValueStoreExt};
