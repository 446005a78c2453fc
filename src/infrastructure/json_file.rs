use super::check_version;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::PaymentStore;
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

type Payments = BTreeMap<String, PaymentRecord>;

/// A payment store backed by a single JSON document.
///
/// Every write replaces the file atomically through a temporary file in the
/// same directory. Writers inside one process are serialized by a mutex;
/// the version check catches records loaded before another write landed.
#[derive(Clone)]
pub struct JsonFilePaymentStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFilePaymentStore {
    /// Opens the store at `path`. The file is created on first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn read_all(&self) -> Result<Payments, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(Payments::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Payments::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, payments: &Payments) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, payments)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for JsonFilePaymentStore {
    async fn create(&self, mut record: PaymentRecord) -> Result<PaymentRecord, StorageError> {
        let _guard = self.lock.lock().await;
        let mut payments = self.read_all()?;
        if payments.contains_key(&record.payment_id) {
            return Err(StorageError::AlreadyExists(record.payment_id));
        }
        record.version = 1;
        payments.insert(record.payment_id.clone(), record.clone());
        self.write_all(&payments)?;
        Ok(record)
    }

    async fn load(&self, payment_id: &str) -> Result<Option<PaymentRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all()?.remove(payment_id))
    }

    async fn save(&self, record: &mut PaymentRecord) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut payments = self.read_all()?;
        check_version(payments.get(&record.payment_id), record)?;
        let mut next = record.clone();
        next.version += 1;
        payments.insert(next.payment_id.clone(), next);
        self.write_all(&payments)?;
        record.version += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentState;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_json_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payments.json");

        let store = JsonFilePaymentStore::open(&path);
        let mut record = store.create(PaymentRecord::new("1")).await.unwrap();
        record.state = PaymentState::Authorization;
        record.remote_id = Some("999".to_string());
        store.save(&mut record).await.unwrap();
        drop(store);

        let reopened = JsonFilePaymentStore::open(&path);
        let loaded = reopened.load("1").await.unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.version, 2);
    }

    #[tokio::test]
    async fn test_json_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFilePaymentStore::open(dir.path().join("absent.json"));
        assert!(store.load("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_store_conflict_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let store = JsonFilePaymentStore::open(dir.path().join("payments.json"));
        store.create(PaymentRecord::new("1")).await.unwrap();

        let mut stale = PaymentRecord::new("1");
        stale.version = 7;
        stale.state = PaymentState::Failed;
        assert!(matches!(
            store.save(&mut stale).await,
            Err(StorageError::Conflict { found: 1, .. })
        ));
        let loaded = store.load("1").await.unwrap().unwrap();
        assert_eq!(loaded.state, PaymentState::Pending);
    }

    #[tokio::test]
    async fn test_json_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payments.json");
        fs::write(&path, b"{not json").unwrap();
        let store = JsonFilePaymentStore::open(&path);
        assert!(matches!(
            store.load("1").await,
            Err(StorageError::Serialization(_))
        ));
    }
}
