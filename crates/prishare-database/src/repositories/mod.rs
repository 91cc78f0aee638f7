//! Repository implementations for all PriShare records.

pub mod access_log;
pub mod document;
pub mod link;
pub mod settings;

pub use access_log::AccessLogRepository;
pub use document::DocumentRepository;
pub use link::LinkRepository;
pub use settings::SettingsRepository;
