pub mod naver;
pub mod toss;

use {
    crate::domain::{
        confirmation::{ConfirmationRequest, ConfirmedPayment, RejectReason},
        error::GatewayError,
    },
    std::{collections::HashMap, future::Future, pin::Pin},
    thiserror::Error,
};

/// Untrusted key/value data from a provider redirect. Everything in here came
/// from the buyer's browser.
pub type CallbackParams = HashMap<String, String>;

/// Raw outcome of a confirmation call, before classification.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ProviderReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a 2xx confirmation reply still did not yield a confirmed payment.
#[derive(Debug, Error)]
pub enum ParseRejection {
    #[error("malformed confirmation response: {0}")]
    Malformed(String),

    #[error("provider declined confirmation: {code}")]
    Declined { code: String, message: String },
}

/// One payment provider, normalized. Adapters own the provider's wire format;
/// outcome classification lives in the confirmation service.
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Validate the redirect parameters and build the normalized request.
    /// Rejections here must never be preceded by a backend call.
    fn normalize_callback(
        &self,
        params: &CallbackParams,
    ) -> Result<ConfirmationRequest, RejectReason>;

    /// Issue the server-to-server confirmation call, carrying the request's
    /// idempotency key.
    fn confirm(
        &self,
        request: &ConfirmationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply, GatewayError>> + Send + '_>>;

    /// Interpret a 2xx confirmation body.
    fn parse_confirmed(&self, body: &serde_json::Value)
    -> Result<ConfirmedPayment, ParseRejection>;

    /// Fetch full payment details for the result view.
    fn lookup(
        &self,
        id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, GatewayError>> + Send + '_>>;

    /// Where to send the buyer after a confirmed payment. Carries only the
    /// identifiers the result view needs to re-fetch details.
    fn success_redirect(&self, confirmed: &ConfirmedPayment) -> String;
}

pub(crate) fn require<'a>(
    params: &'a CallbackParams,
    key: &'static str,
) -> Result<&'a str, RejectReason> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(RejectReason::MissingParameter(key))
}
