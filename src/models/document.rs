use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored document owned by a user
///
/// Only `file_path` matters to the pipeline; the rest is bookkeeping kept so
/// a dashboard can list a user's documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub file_path: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

impl DocumentRecord {
    /// Create a record with a fresh time-based id
    pub fn new(
        title: impl Into<String>,
        file_path: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("doc-{}", now.timestamp_nanos_opt().unwrap_or_default()),
            title: title.into(),
            file_path: file_path.into(),
            owner_id: owner_id.into(),
            created_at: now,
            last_accessed: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Mark as accessed now
    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }
}
