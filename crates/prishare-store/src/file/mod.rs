//! Directory-of-JSON-files key-value store.

pub mod store;

pub use store::FileStore;
