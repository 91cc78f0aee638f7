//! PIN hashing and policy enforcement.

pub mod hasher;
pub mod validator;

pub use hasher::PinHasher;
pub use validator::PinValidator;
