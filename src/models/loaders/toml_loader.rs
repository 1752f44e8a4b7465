use crate::models::document::DocumentRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Load one document record from a TOML file
pub async fn load_toml_to_document(toml_file_path: &Path) -> Result<DocumentRecord> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("cannot read TOML file: {}", toml_file_path.display()))?;

    let record: DocumentRecord = toml::from_str(&content)
        .with_context(|| format!("cannot parse TOML file: {}", toml_file_path.display()))?;

    Ok(record)
}

/// Write one document record as TOML, replacing any previous file
pub async fn save_document_to_toml(record: &DocumentRecord, toml_file_path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(record)
        .with_context(|| format!("cannot serialize document {}", record.id))?;

    fs::write(toml_file_path, content)
        .await
        .with_context(|| format!("cannot write TOML file: {}", toml_file_path.display()))?;

    Ok(())
}

/// Load every document record in a folder
///
/// Files that fail to parse are logged and skipped.
pub async fn load_all_toml_files(folder_path: &Path) -> Result<Vec<DocumentRecord>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("folder does not exist: {}", folder_path.display());
    }

    let mut records = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("cannot read folder: {}", folder_path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::debug!(
                "loading: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_toml_to_document(&path).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("failed to load {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(records)
}
