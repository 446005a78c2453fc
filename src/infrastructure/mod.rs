//! Storage and clock adapters for the domain ports.

pub mod clock;
pub mod in_memory;
pub mod json_file;

use crate::domain::payment::PaymentRecord;
use crate::error::StorageError;

/// Compare-and-swap check shared by the stores: `record` may replace `stored`
/// only if it was loaded at the stored version.
pub(crate) fn check_version(
    stored: Option<&PaymentRecord>,
    record: &PaymentRecord,
) -> Result<(), StorageError> {
    let found = stored.map_or(0, |r| r.version);
    if found == record.version {
        Ok(())
    } else {
        Err(StorageError::Conflict {
            payment_id: record.payment_id.clone(),
            expected: record.version,
            found,
        })
    }
}
