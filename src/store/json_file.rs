//! JSON file backed rate store.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{DateRateRecord, RateStore, RatesFile, StoreError};

/// Rate store over a single JSON file holding `{ "dates": [...] }`.
///
/// The file is re-read on every call. Writes go to `<file>.tmp` and are
/// renamed over the target, and appends hold `write_lock` for the whole
/// read-modify-write so appends from this process never overwrite each other.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the empty default collection if the file is missing, otherwise
    /// check that it parses. Returns the number of stored dates.
    pub async fn ensure_initialized(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::try_exists(&self.path).await {
            Ok(true) => Ok(self.read_file().await?.dates.len()),
            Ok(false) => {
                self.write_file(&RatesFile::default()).await?;
                info!(path = %self.path.display(), "created empty rate store");
                Ok(0)
            }
            Err(source) => Err(self.io_error(source)),
        }
    }

    async fn read_file(&self) -> Result<RatesFile, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "rate store missing, using empty collection");
                return Ok(RatesFile::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RatesFile::default());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        })
    }

    async fn write_file(&self, file: &RatesFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(file)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let mut out = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|e| self.io_error(e))?;
        out.write_all(&json).await.map_err(|e| self.io_error(e))?;
        out.sync_all().await.map_err(|e| self.io_error(e))?;
        drop(out);

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl RateStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<DateRateRecord>, StoreError> {
        Ok(self.read_file().await?.dates)
    }

    async fn append(&self, record: DateRateRecord) -> Result<DateRateRecord, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut file = self.read_file().await?;
        file.dates.push(record.clone());
        self.write_file(&file).await?;

        info!(
            date = record.date().unwrap_or("-"),
            total = file.dates.len(),
            "appended rate record"
        );
        Ok(record)
    }
}
