use {
    super::{CallbackParams, ParseRejection, ProviderAdapter, ProviderReply, require},
    crate::{
        config::NaverConfig,
        domain::{
            confirmation::{ConfirmationRequest, ConfirmedPayment, RejectReason},
            error::GatewayError,
            money::MoneyAmount,
        },
    },
    chrono::Utc,
    serde::Deserialize,
    std::{future::Future, pin::Pin},
};

const SUCCESS_RESULT_CODE: &str = "Success";

/// Regional wallet provider. Confirmation is a form POST identified by
/// client-id / client-secret / chain-id headers.
pub struct NaverAdapter {
    http: reqwest::Client,
    config: NaverConfig,
}

impl NaverAdapter {
    pub fn new(http: reqwest::Client, config: NaverConfig) -> Self {
        Self { http, config }
    }

    async fn confirm_inner(
        &self,
        request: &ConfirmationRequest,
    ) -> Result<ProviderReply, GatewayError> {
        let url = format!(
            "{}/naverpay/payments/v2.2/apply/payment",
            self.config.api_base
        );

        let res = self
            .http
            .post(&url)
            .header("X-Naver-Client-Id", &self.config.client_id)
            .header("X-Naver-Client-Secret", &self.config.client_secret)
            .header("X-NaverPay-Chain-Id", &self.config.chain_id)
            .header("X-NaverPay-Idempotency-Key", &request.idempotency_key)
            .form(&[("paymentId", request.provider_transaction_id.as_str())])
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);
        Ok(ProviderReply { status, body })
    }

    async fn lookup_inner(&self, payment_id: &str) -> Result<serde_json::Value, GatewayError> {
        let url = format!(
            "{}/naverpay/payments/v2.2/list/history/{payment_id}?pageNumber=1&rowsPerPage=50",
            self.config.api_base
        );
        let res = self
            .http
            .get(&url)
            .header("X-Naver-Client-Id", &self.config.client_id)
            .header("X-Naver-Client-Secret", &self.config.client_secret)
            .header("X-NaverPay-Chain-Id", &self.config.chain_id)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(GatewayError::Status(res.status().as_u16()));
        }
        Ok(res.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct NaverConfirmReply {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    body: Option<NaverConfirmBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaverConfirmBody {
    payment_id: String,
    detail: NaverConfirmDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NaverConfirmDetail {
    merchant_pay_key: String,
    total_pay_amount: i64,
    #[serde(default)]
    primary_pay_means: Option<String>,
}

impl ProviderAdapter for NaverAdapter {
    fn name(&self) -> &'static str {
        "naver"
    }

    fn normalize_callback(
        &self,
        params: &CallbackParams,
    ) -> Result<ConfirmationRequest, RejectReason> {
        let payment_id = require(params, "paymentId")?;
        let result_code = require(params, "resultCode")?;
        if result_code != SUCCESS_RESULT_CODE {
            return Err(RejectReason::ProviderReportedFailure {
                code: result_code.to_string(),
            });
        }

        Ok(ConfirmationRequest {
            provider_transaction_id: payment_id.to_string(),
            merchant_order_id: None,
            amount: None,
            // Known weakness: the wall-clock suffix mints a fresh key per
            // call, so provider-side dedup covers retries of this one request
            // only, not a redelivered callback. Best-effort single attempt,
            // not exactly-once.
            idempotency_key: format!("{payment_id}-{}", Utc::now().timestamp_millis()),
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
        let parsed: NaverConfirmReply = serde_json::from_value(body.clone())
            .map_err(|e| ParseRejection::Malformed(e.to_string()))?;

        // A 2xx reply still carries a decline code when the apply step fails.
        if parsed.code != SUCCESS_RESULT_CODE {
            return Err(ParseRejection::Declined {
                code: parsed.code,
                message: parsed
                    .message
                    .unwrap_or_else(|| "payment confirmation was declined".to_string()),
            });
        }

        let reply_body = parsed.body.ok_or_else(|| {
            ParseRejection::Malformed("missing body in confirmation reply".to_string())
        })?;
        let amount = MoneyAmount::new(reply_body.detail.total_pay_amount)
            .map_err(|e| ParseRejection::Malformed(e.to_string()))?;

        Ok(ConfirmedPayment {
            provider_transaction_id: reply_body.payment_id,
            merchant_order_id: reply_body.detail.merchant_pay_key,
            amount,
            approved_at: None,
            method: reply_body.detail.primary_pay_means,
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
            "/payment-complete/naver?paymentId={}&status=confirmed",
            confirmed.provider_transaction_id
        )
    }
}
