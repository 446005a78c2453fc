use super::check_version;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::PaymentStore;
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for payment records.
///
/// Uses `Arc<RwLock<HashMap<String, PaymentRecord>>>` so clones share state.
/// Each `save` checks and bumps the version under the write lock.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<String, PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn create(&self, mut record: PaymentRecord) -> Result<PaymentRecord, StorageError> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&record.payment_id) {
            return Err(StorageError::AlreadyExists(record.payment_id));
        }
        record.version = 1;
        payments.insert(record.payment_id.clone(), record.clone());
        Ok(record)
    }

    async fn load(&self, payment_id: &str) -> Result<Option<PaymentRecord>, StorageError> {
        let payments = self.payments.read().await;
        Ok(payments.get(payment_id).cloned())
    }

    async fn save(&self, record: &mut PaymentRecord) -> Result<(), StorageError> {
        let mut payments = self.payments.write().await;
        check_version(payments.get(&record.payment_id), record)?;
        record.version += 1;
        payments.insert(record.payment_id.clone(), record.clone());
        Ok(())
    }
}
