//! # prishare-auth
//!
//! PIN protection for shared links.
//!
//! - `pin`: Argon2id PIN hashing/verification and PIN policy checks
//!
//! A PIN is hashed once at share time with a random salt; the stored PHC
//! string is all that is persisted, and verification recomputes the hash
//! from the caller's attempt.

pub mod pin;

pub use pin::{PinHasher, PinValidator};
