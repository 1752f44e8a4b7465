//! Document store - infrastructure layer
//!
//! One TOML record per document in a folder. The pipeline only needs
//! `fetch_text`; the other operations serve the driver's document listing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};
use crate::infrastructure::TextExtractor;
use crate::models::{load_all_toml_files, load_toml_to_document, save_document_to_toml, DocumentRecord};

/// Lookup of document text by identifier
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Full extracted text of a stored document
    async fn fetch_text(&self, document_id: &str) -> PipelineResult<String>;
}

/// Folder of TOML document records
pub struct TomlDocumentStore {
    folder: PathBuf,
    extractor: Arc<dyn TextExtractor>,
}

impl TomlDocumentStore {
    /// Open (and create if needed) the store folder
    pub async fn open(folder: impl Into<PathBuf>, extractor: Arc<dyn TextExtractor>) -> PipelineResult<Self> {
        let folder = folder.into();
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|e| PipelineError::store(folder.display().to_string(), e))?;
        debug!("document store at {}", folder.display());
        Ok(Self { folder, extractor })
    }

    fn record_path(&self, id: &str) -> PipelineResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PipelineError::DocumentNotFound { id: id.to_string() });
        }
        Ok(self.folder.join(format!("{}.toml", id)))
    }

    /// Insert or replace a record
    pub async fn save(&self, record: &DocumentRecord) -> PipelineResult<()> {
        let path = self.record_path(&record.id)?;
        save_document_to_toml(record, &path)
            .await
            .map_err(|e| store_error(&path, e))?;
        info!("[doc {}] saved \"{}\"", record.id, record.title);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> PipelineResult<DocumentRecord> {
        let path = self.record_path(id)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(PipelineError::DocumentNotFound { id: id.to_string() });
        }
        load_toml_to_document(&path)
            .await
            .map_err(|e| store_error(&path, e))
    }

    /// Documents of one owner, most recently accessed first
    pub async fn list_for_owner(&self, owner_id: &str) -> PipelineResult<Vec<DocumentRecord>> {
        let mut records: Vec<DocumentRecord> = load_all_toml_files(&self.folder)
            .await
            .map_err(|e| store_error(&self.folder, e))?
            .into_iter()
            .filter(|r| r.owner_id == owner_id)
            .collect();
        records.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
        Ok(records)
    }

    /// Record for `file_path` owned by `owner_id`, saving a new one only when
    /// the owner has not registered that file yet
    pub async fn register_file(
        &self,
        title: &str,
        file_path: &str,
        owner_id: &str,
    ) -> PipelineResult<DocumentRecord> {
        let existing = self
            .list_for_owner(owner_id)
            .await?
            .into_iter()
            .find(|r| r.file_path == file_path);
        if let Some(record) = existing {
            debug!("[doc {}] already registered for {}", record.id, file_path);
            return Ok(record);
        }

        let record = DocumentRecord::new(title, file_path, owner_id);
        self.save(&record).await?;
        Ok(record)
    }

    /// Update the last-accessed timestamp
    pub async fn touch(&self, id: &str) -> PipelineResult<DocumentRecord> {
        let mut record = self.get(id).await?;
        record.touch();
        self.save(&record).await?;
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> PipelineResult<()> {
        let path = self.record_path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("[doc {}] deleted", id);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PipelineError::DocumentNotFound { id: id.to_string() })
            }
            Err(e) => Err(PipelineError::store(path.display().to_string(), e)),
        }
    }
}

#[async_trait]
impl DocumentStore for TomlDocumentStore {
    async fn fetch_text(&self, document_id: &str) -> PipelineResult<String> {
        let record = self.touch(document_id).await?;
        debug!("[doc {}] extracting {}", record.id, record.file_path);
        self.extractor
            .extract_text(Path::new(&record.file_path))
            .await
    }
}

fn store_error(path: &Path, err: anyhow::Error) -> PipelineError {
    PipelineError::Store {
        path: path.display().to_string(),
        source: err.into(),
    }
}
