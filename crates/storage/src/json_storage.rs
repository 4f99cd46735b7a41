//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON file per record under `<root>/records/`.
//! Files are created, never rewritten.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tally_core::DailyDeltaRecord;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::trait_::select_recent;
use super::{RecordStore, Result, SortOrder, StorageError};

/// File-based JSON record store.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the `records/` directory.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("records")).await?;
        Ok(Self { root })
    }

    /// Directory the record files live in.
    pub fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    fn record_path(&self, record: &DailyDeltaRecord) -> PathBuf {
        self.records_dir()
            .join(format!("{}_{}.json", record.date.format("%Y-%m-%d"), record.id))
    }
}

#[async_trait]
impl RecordStore for JsonStorage {
    async fn append_record(&mut self, record: &DailyDeltaRecord) -> Result<()> {
        let path = self.record_path(record);
        let json = serde_json::to_string_pretty(record)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    StorageError::Write(format!("record {} already exists", record.id))
                } else {
                    e.into()
                }
            })?;
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;

        debug!("Appended record {} for {}", record.id, record.date);
        Ok(())
    }

    async fn query_recent(&self, max_count: usize, order: SortOrder) -> Result<Vec<DailyDeltaRecord>> {
        let all = list_dir(&self.records_dir()).await?;
        Ok(select_recent(all, max_count, order))
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable record {}: {}", path.display(), e),
        }
    }
    Ok(items)
}
