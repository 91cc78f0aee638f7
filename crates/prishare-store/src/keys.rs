//! Store key builders for every PriShare collection.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

/// Keys for the collections kept in the store, under a common prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    prefix: String,
}

impl StoreKeys {
    /// Build keys under `prefix` (e.g. `"prishare_"`).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Key holding every shared link, as an ordered sequence.
    pub fn shared_links(&self) -> String {
        format!("{}shared_links", self.prefix)
    }

    /// Key holding every document, as an ordered sequence.
    pub fn documents(&self) -> String {
        format!("{}documents", self.prefix)
    }

    /// Key holding the singleton user settings record.
    pub fn user_settings(&self) -> String {
        format!("{}user_settings", self.prefix)
    }

    /// Key holding the access log, as an ordered sequence.
    pub fn access_logs(&self) -> String {
        format!("{}access_logs", self.prefix)
    }
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self::new("prishare_")
    }
}
