use {
    super::{CallbackParams, ParseRejection, ProviderAdapter, ProviderReply, require},
    crate::{
        config::TossConfig,
        domain::{
            confirmation::{ConfirmationRequest, ConfirmedPayment, RejectReason},
            error::GatewayError,
            money::MoneyAmount,
        },
    },
    chrono::{DateTime, FixedOffset},
    serde::Deserialize,
    std::{future::Future, pin::Pin},
};

/// Card / easy-pay processor. Confirmation is a JSON POST authenticated with
/// HTTP Basic auth built from the secret key and an empty password.
pub struct TossAdapter {
    http: reqwest::Client,
    config: TossConfig,
}

impl TossAdapter {
    pub fn new(http: reqwest::Client, config: TossConfig) -> Self {
        Self { http, config }
    }

    async fn confirm_inner(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<ProviderReply, GatewayError> {
        let url = format!("{}/v1/payments/confirm", self.config.api_base);
        let body = serde_json::json!({
            "orderId": request.merchant_order_id,
            "paymentKey": request.provider_transaction_id,
            "amount": request.amount.map(|a| a.minor_units()),
        });

        let res = self
            .http
            .post(&url)
            .basic_auth(&self.config.secret_key, Some(""))
            .header("Idempotency-Key", &request.idempotency_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);
        Ok(ProviderReply { status, body })
    }

    async fn lookup_inner(&self, order_id: &str) -> Result<serde_json::Value, GatewayError> {
        let url = format!("{}/v1/payments/orders/{order_id}", self.config.api_base);
        let res = self
            .http
            .get(&url)
            .basic_auth(&self.config.secret_key, Some(""))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(GatewayError::Status(res.status().as_u16()));
        }
        Ok(res.json().await?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TossConfirmBody {
    order_id: String,
    payment_key: String,
    total_amount: i64,
    #[serde(default)]
    approved_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    method: Option<String>,
}

impl ProviderAdapter for TossAdapter {
    fn name(&self) -> &'static str {
        "toss"
    }

    fn normalize_callback(
        &self,
        params: &CallbackParams,
    ) -> Result<ConfirmationRequest, RejectReason> {
        let order_id = require(params, "orderId")?;
        let payment_key = require(params, "paymentKey")?;
        let amount = require(params, "amount")?
            .parse::<i64>()
            .ok()
            .and_then(|v| MoneyAmount::new(v).ok())
            .ok_or(RejectReason::InvalidParameter("amount"))?;

        Ok(ConfirmationRequest {
            provider_transaction_id: payment_key.to_string(),
            merchant_order_id: Some(order_id.to_string()),
            amount: Some(amount),
            // The payment key alone identifies the transaction, so replayed
            // callbacks reuse the same key and the provider collapses them.
            idempotency_key: payment_key.to_string(),
        })
    }

    fn confirm(
        &self,
        request: &ConfirmationRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderReply, GatewayError>> + Send + '_>> {
        let request = request.clone();
        Box::pin(async move { self.confirm_inner(&request).await })
    }

    fn parse_confirmed(
        &self,
        body: &serde_json::Value,
    ) -> Result<ConfirmedPayment, ParseRejection> {
        let parsed: TossConfirmBody = serde_json::from_value(body.clone())
            .map_err(|e| ParseRejection::Malformed(e.to_string()))?;
        let amount = MoneyAmount::new(parsed.total_amount)
            .map_err(|e| ParseRejection::Malformed(e.to_string()))?;

        Ok(ConfirmedPayment {
            provider_transaction_id: parsed.payment_key,
            merchant_order_id: parsed.order_id,
            amount,
            approved_at: parsed.approved_at,
            method: parsed.method,
            raw: body.clone(),
        })
    }

    fn lookup(
        &self,
        id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, GatewayError>> + Send + '_>> {
        let id = id.to_string();
        Box::pin(async move { self.lookup_inner(&id).await })
    }

    fn success_redirect(&self, confirmed: &ConfirmedPayment) -> String {
        format!(
            "/payment-complete/toss?orderId={}",
            confirmed.merchant_order_id
        )
    }
}
