use {
    crate::{
        ProviderSlot,
        adapters::{CallbackParams, ParseRejection, ProviderAdapter},
        domain::{
            confirmation::{ConfirmationResult, ConfirmedPayment},
            record::{InsertOutcome, PaymentRecord, RecordStore},
        },
    },
    tracing::field,
};

/// Confirm one provider callback end to end: validate, call the provider
/// exactly once, classify the outcome, and record the confirmed payment.
///
/// The confirmation call is never retried here. Reissuing it without the
/// original idempotency key can double-charge the buyer, so replays are left
/// to the operator.
#[tracing::instrument(name = "confirm", skip_all, fields(provider = field::Empty))]
pub async fn confirm_callback(
    slot: &ProviderSlot,
    store: &dyn RecordStore,
    params: &CallbackParams,
) -> ConfirmationResult {
    let adapter = match slot {
        ProviderSlot::Ready(adapter) => adapter.as_ref(),
        ProviderSlot::Missing(var) => {
            tracing::error!(var, "confirmation requested for unconfigured provider");
            return ConfirmationResult::ConfigurationError { missing: var };
        }
    };
    tracing::Span::current().record("provider", adapter.name());

    let request = match adapter.normalize_callback(params) {
        Ok(request) => request,
        Err(reason) => {
            tracing::info!(%reason, "callback rejected before confirmation");
            return ConfirmationResult::Rejected { reason };
        }
    };

    tracing::debug!(txn = %request.provider_transaction_id, "issuing confirmation call");
    let reply = match adapter.confirm(&request).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(
                error = %e,
                txn = %request.provider_transaction_id,
                "confirmation call failed in transport"
            );
            return ConfirmationResult::ProviderError {
                code: "transport".to_string(),
                message: "payment provider was unreachable".to_string(),
                http_status: None,
            };
        }
    };

    if !reply.is_success() {
        // The raw body goes to the log only; the caller sees code and message.
        tracing::error!(status = reply.status, body = %reply.body, "provider rejected confirmation");
        let code = reply
            .body
            .get("code")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| reply.status.to_string());
        let message = reply
            .body
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| "payment confirmation failed".to_string());
        return ConfirmationResult::ProviderError {
            code,
            message,
            http_status: Some(reply.status),
        };
    }

    let confirmed = match adapter.parse_confirmed(&reply.body) {
        Ok(confirmed) => confirmed,
        Err(ParseRejection::Malformed(detail)) => {
            tracing::error!(detail = %detail, body = %reply.body, "unreadable provider confirmation body");
            return ConfirmationResult::ProviderError {
                code: "malformed-response".to_string(),
                message: "provider returned an unreadable confirmation response".to_string(),
                http_status: None,
            };
        }
        Err(ParseRejection::Declined { code, message }) => {
            tracing::warn!(code = %code, "provider declined inside a success reply");
            return ConfirmationResult::ProviderError {
                code,
                message,
                http_status: None,
            };
        }
    };

    record_confirmed(adapter, store, &confirmed).await;
    ConfirmationResult::Confirmed(confirmed)
}

async fn record_confirmed(
    adapter: &dyn ProviderAdapter,
    store: &dyn RecordStore,
    confirmed: &ConfirmedPayment,
) {
    let record = PaymentRecord::from_confirmed(adapter.name(), confirmed);
    match store.insert_confirmed(record).await {
        Ok(InsertOutcome::Inserted) => {
            tracing::info!(
                order_id = %confirmed.merchant_order_id,
                amount = %confirmed.amount,
                "confirmed payment recorded"
            );
        }
        Ok(InsertOutcome::AlreadyRecorded) => {
            tracing::info!(
                order_id = %confirmed.merchant_order_id,
                "confirmation replayed, record already present"
            );
        }
        Err(e) => {
            // The buyer is charged either way; a dropped record is logged,
            // not surfaced as a failed payment.
            tracing::error!(
                error = %e,
                order_id = %confirmed.merchant_order_id,
                "failed to record confirmed payment"
            );
        }
    }
}
