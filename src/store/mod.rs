//! Rate Store
//!
//! Per-date USD rate snapshots and the storage interface the HTTP handlers
//! read through. Every read goes back to the backing storage so writes made
//! outside this process are observed on the next request.
//!
//! - `json_file` - durable store over a single `{ "dates": [...] }` file
//! - `memory` - in-process store for tests and local development

pub mod json_file;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// One day's snapshot of currency rates, expressed as units of currency per 1 USD.
///
/// The shape is never validated: whatever JSON was posted or written to the
/// file is stored and returned untouched. `date` and `rates` are only read
/// at lookup time, and anything that is not a string date or a numeric rate
/// reads as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateRateRecord(pub Value);

impl DateRateRecord {
    pub fn new(date: impl Into<String>, rates: impl IntoIterator<Item = (String, f64)>) -> Self {
        let rates: Map<String, Value> = rates.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
        let mut record = Map::new();
        record.insert("date".into(), Value::String(date.into()));
        record.insert("rates".into(), Value::Object(rates));
        Self(Value::Object(record))
    }

    /// ISO calendar date, compared verbatim (no parsing or normalization)
    pub fn date(&self) -> Option<&str> {
        self.0.get("date").and_then(Value::as_str)
    }

    /// Stored rate for `code`, if it is a JSON number.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.0.get("rates")?.get(code)?.as_f64()
    }
}

impl From<Value> for DateRateRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// On-disk layout of the rate file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatesFile {
    #[serde(default)]
    pub dates: Vec<DateRateRecord>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rate store {} is malformed: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate store io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode rate store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage access used by the request handlers.
///
/// Implementations must return records in append order.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Read the full collection from the backing storage.
    async fn load_all(&self) -> Result<Vec<DateRateRecord>, StoreError>;

    /// Append a record and persist the whole collection, returning what was stored.
    async fn append(&self, record: DateRateRecord) -> Result<DateRateRecord, StoreError>;

    /// First record whose `date` matches exactly.
    async fn find_by_date(&self, date: &str) -> Result<Option<DateRateRecord>, StoreError> {
        let records = self.load_all().await?;
        Ok(records.into_iter().find(|r| r.date() == Some(date)))
    }
}
