use {
    super::money::MoneyAmount,
    chrono::{DateTime, FixedOffset},
    derive_more::Display,
    serde::Serialize,
};

/// Normalized server-to-server confirmation request, produced from a
/// provider's untrusted callback parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationRequest {
    pub provider_transaction_id: String,
    /// Absent for the wallet provider, whose callback carries no merchant
    /// order reference; it only shows up in the confirmation response.
    pub merchant_order_id: Option<String>,
    pub amount: Option<MoneyAmount>,
    pub idempotency_key: String,
}

/// Why a callback was rejected without touching the provider backend.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RejectReason {
    #[display("missing callback parameter: {_0}")]
    MissingParameter(&'static str),
    #[display("invalid callback parameter: {_0}")]
    InvalidParameter(&'static str),
    #[display("provider reported failure: {code}")]
    ProviderReportedFailure { code: String },
}

impl RejectReason {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "missing_parameter",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::ProviderReportedFailure { .. } => "provider_reported_failure",
        }
    }

    /// What the buyer-facing response says. Parameter names and provider
    /// codes stay in the internal log.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingParameter(_) => "missing required callback parameters",
            Self::InvalidParameter(_) => "invalid callback parameter",
            Self::ProviderReportedFailure { .. } => "payment was not completed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmedPayment {
    pub provider_transaction_id: String,
    pub merchant_order_id: String,
    pub amount: MoneyAmount,
    pub approved_at: Option<DateTime<FixedOffset>>,
    pub method: Option<String>,
    /// Opaque provider payload, forwarded to the result view untouched.
    pub raw: serde_json::Value,
}

/// Terminal outcome of one callback invocation. Exactly one variant per
/// callback; no outcome is ever revisited.
#[derive(Debug, Clone)]
pub enum ConfirmationResult {
    Confirmed(ConfirmedPayment),
    Rejected {
        reason: RejectReason,
    },
    ProviderError {
        code: String,
        message: String,
        http_status: Option<u16>,
    },
    ConfigurationError {
        missing: &'static str,
    },
}
