use super::payment::PaymentRecord;
use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage collaborator for payment records.
///
/// `save` is a compare-and-swap on `PaymentRecord::version`: it succeeds only
/// when the stored version equals the record's, then bumps the version on
/// both. Concurrent load-mutate-save sequences for one payment therefore
/// fail with `StorageError::Conflict` instead of overwriting each other.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create(&self, record: PaymentRecord) -> Result<PaymentRecord, StorageError>;
    async fn load(&self, payment_id: &str) -> Result<Option<PaymentRecord>, StorageError>;
    async fn save(&self, record: &mut PaymentRecord) -> Result<(), StorageError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type ClockBox = Box<dyn Clock>;
