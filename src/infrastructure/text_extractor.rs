//! Text extraction - infrastructure layer
//!
//! Owns file access and only exposes "give me the plain text of this file".

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lopdf::Document as PdfDocument;
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};

/// Source of a document's plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, path: &Path) -> PipelineResult<String>;
}

/// Reads `.pdf` files with lopdf and everything else as UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

impl FileTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn is_pdf(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("pdf"))
    }

    /// Page-by-page extraction; unreadable pages are skipped
    fn extract_pdf(path: &Path) -> PipelineResult<String> {
        let path_str = path.display().to_string();
        let doc = PdfDocument::load(path).map_err(|e| PipelineError::extraction(&path_str, e))?;
        let pages = doc.get_pages();

        let mut content = String::new();
        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => {
                    content.push_str(&text);
                    content.push('\n');
                }
                Err(e) => {
                    warn!("failed to extract text from page {} of {}: {}", page_num, path_str, e);
                }
            }
        }

        debug!("extracted {} chars from {} pdf pages", content.len(), pages.len());
        Ok(content)
    }
}

#[async_trait]
impl TextExtractor for FileTextExtractor {
    async fn extract_text(&self, path: &Path) -> PipelineResult<String> {
        let path_str = path.display().to_string();

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(PipelineError::extraction(
                &path_str,
                std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            ));
        }

        if Self::is_pdf(path) {
            let owned: PathBuf = path.to_path_buf();
            tokio::task::spawn_blocking(move || Self::extract_pdf(&owned))
                .await
                .map_err(|e| PipelineError::extraction(&path_str, e))?
        } else {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| PipelineError::extraction(&path_str, e))
        }
    }
}
