use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque entry identifier, assigned once at creation
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    pub fn generate() -> Self {
        EntryId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EntryId {
    fn from(raw: String) -> Self {
        EntryId(raw)
    }
}

impl From<&str> for EntryId {
    fn from(raw: &str) -> Self {
        EntryId(raw.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored clipboard snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// The exact captured text; its trimmed form is never empty
    pub content: String,
    /// Unix millis, refreshed whenever the same content is observed again
    pub touched_at: i64,
    pub pinned: bool,
}

impl Entry {
    pub fn new(content: impl Into<String>, touched_at: i64) -> Self {
        Entry {
            id: EntryId::generate(),
            content: content.into(),
            touched_at,
            pinned: false,
        }
    }
}
