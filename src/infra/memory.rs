use {
    crate::domain::{
        error::StoreError,
        record::{InsertOutcome, PaymentRecord, RecordStore},
    },
    std::{
        collections::{HashMap, hash_map::Entry},
        future::Future,
        pin::Pin,
        sync::{Mutex, MutexGuard},
    },
};

/// Process-local record store keyed by merchant order id. Stands in for a
/// durable store in tests and single-node deployments.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, PaymentRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, PaymentRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("record store lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryRecordStore {
    fn insert_confirmed(
        &self,
        record: PaymentRecord,
    ) -> Pin<Box<dyn Future<Output = Result<InsertOutcome, StoreError>> + Send + '_>> {
        let outcome = self.lock().map(|mut map| {
            match map.entry(record.merchant_order_id.clone()) {
                Entry::Occupied(_) => InsertOutcome::AlreadyRecorded,
                Entry::Vacant(slot) => {
                    slot.insert(record);
                    InsertOutcome::Inserted
                }
            }
        });
        Box::pin(std::future::ready(outcome))
    }

    fn find_by_order(
        &self,
        merchant_order_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PaymentRecord>, StoreError>> + Send + '_>> {
        let found = self.lock().map(|map| map.get(merchant_order_id).cloned());
        Box::pin(std::future::ready(found))
    }

    fn find_by_transaction(
        &self,
        provider_transaction_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PaymentRecord>, StoreError>> + Send + '_>> {
        let found = self.lock().map(|map| {
            map.values()
                .find(|r| r.provider_transaction_id == provider_transaction_id)
                .cloned()
        });
        Box::pin(std::future::ready(found))
    }
}
