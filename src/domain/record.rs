use {
    super::confirmation::ConfirmedPayment,
    super::error::StoreError,
    super::money::MoneyAmount,
    chrono::{DateTime, FixedOffset, Utc},
    serde::Serialize,
    std::{future::Future, pin::Pin},
    uuid::Uuid,
};

#[derive(Debug, Clone, Serialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub provider: &'static str,
    pub merchant_order_id: String,
    pub provider_transaction_id: String,
    pub amount: MoneyAmount,
    pub method: Option<String>,
    pub approved_at: Option<DateTime<FixedOffset>>,
    pub raw: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn from_confirmed(provider: &'static str, confirmed: &ConfirmedPayment) -> Self {
        Self {
            id: Uuid::now_v7(),
            provider,
            merchant_order_id: confirmed.merchant_order_id.clone(),
            provider_transaction_id: confirmed.provider_transaction_id.clone(),
            amount: confirmed.amount,
            method: confirmed.method.clone(),
            approved_at: confirmed.approved_at,
            raw: confirmed.raw.clone(),
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A record under the same merchant order id already exists; the first
    /// one wins and is left intact.
    AlreadyRecorded,
}

/// Durable home for confirmed payments. Insert is exactly-once keyed by
/// merchant order id, so replayed confirmation callbacks collapse onto one
/// record.
pub trait RecordStore: Send + Sync {
    fn insert_confirmed(
        &self,
        record: PaymentRecord,
    ) -> Pin<Box<dyn Future<Output = Result<InsertOutcome, StoreError>> + Send + '_>>;

    fn find_by_order(
        &self,
        merchant_order_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PaymentRecord>, StoreError>> + Send + '_>>;

    fn find_by_transaction(
        &self,
        provider_transaction_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PaymentRecord>, StoreError>> + Send + '_>>;
}
