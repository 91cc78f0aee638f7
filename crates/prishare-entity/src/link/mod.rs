//! Shared link entities.

pub mod model;
pub mod print;
pub mod status;

pub use model::SharedLink;
pub use print::{ColorMode, PrintSettings};
pub use status::LinkStatus;
