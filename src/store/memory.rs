use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DateRateRecord, RateStore, StoreError};

/// In-memory rate store. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<DateRateRecord>>,
}

impl MemoryStore {
    pub fn new(records: Vec<DateRateRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RateStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<DateRateRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn append(&self, record: DateRateRecord) -> Result<DateRateRecord, StoreError> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }
}
