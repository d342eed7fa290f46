use {
    crate::{
        AppState, ProviderSlot,
        adapters::CallbackParams,
        domain::{
            intent::{NewIntent, PaymentIntent},
            record::RecordStore,
        },
        services::confirmation::confirm_callback,
        transport::dispatch::{Dispatch, dispatch},
    },
    axum::{
        Json, Router,
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    serde_json::json,
    std::sync::Arc,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/api/checkout/intent", post(create_intent))
        .route("/api/toss-payment/confirm", get(confirm_toss))
        .route("/api/naver-payment/confirm", get(confirm_naver))
        .route("/payment-complete/toss", get(toss_result_view))
        .route("/payment-complete/naver", get(naver_result_view))
        .with_state(state)
}

async fn create_intent(Json(new): Json<NewIntent>) -> Json<PaymentIntent> {
    let intent = PaymentIntent::mint(new);
    tracing::info!(order_id = %intent.order_id, amount = %intent.amount, "payment intent minted");
    Json(intent)
}

async fn confirm_toss(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    confirm_entry(state.toss, state.store, params).await
}

async fn confirm_naver(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    confirm_entry(state.naver, state.store, params).await
}

async fn confirm_entry(
    slot: ProviderSlot,
    store: Arc<dyn RecordStore>,
    params: CallbackParams,
) -> Response {
    // The provider call must run to completion even if the buyer's browser
    // drops the connection, so it lives in its own task.
    let task_slot = slot.clone();
    let task = tokio::spawn(async move {
        confirm_callback(&task_slot, store.as_ref(), &params).await
    });

    match task.await {
        Ok(result) => dispatch(&slot, result).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "confirmation task failed");
            Dispatch::internal_error().into_response()
        }
    }
}

async fn toss_result_view(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(order_id) = params.get("orderId").filter(|v| !v.is_empty()) else {
        return Dispatch::reply(
            StatusCode::BAD_REQUEST,
            "missing_parameter",
            "orderId is required",
        )
        .into_response();
    };
    let record = match state.store.find_by_order(order_id).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(error = %e, "record lookup failed");
            None
        }
    };
    render_result_view(&state.toss, "toss", order_id, record).await
}

async fn naver_result_view(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(payment_id) = params.get("paymentId").filter(|v| !v.is_empty()) else {
        return Dispatch::reply(
            StatusCode::BAD_REQUEST,
            "missing_parameter",
            "paymentId is required",
        )
        .into_response();
    };
    let record = match state.store.find_by_transaction(payment_id).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(error = %e, "record lookup failed");
            None
        }
    };
    render_result_view(&state.naver, "naver", payment_id, record).await
}

/// The result page always renders. Provider detail is best effort: when the
/// lookup fails the page degrades to the recorded data plus a notice instead
/// of erroring out.
async fn render_result_view(
    slot: &ProviderSlot,
    provider: &'static str,
    id: &str,
    record: Option<crate::domain::record::PaymentRecord>,
) -> Response {
    let details = match slot {
        ProviderSlot::Ready(adapter) => match adapter.lookup(id).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!(provider, error = %e, "detail lookup failed, rendering degraded view");
                None
            }
        },
        ProviderSlot::Missing(var) => {
            tracing::warn!(provider, var = %var, "detail lookup skipped, provider unconfigured");
            None
        }
    };

    let mut body = json!({
        "provider": provider,
        "id": id,
        "record": record,
    });
    match details {
        Some(details) => body["details"] = details,
        None => body["detail_error"] = json!("could not load details"),
    }
    (StatusCode::OK, Json(body)).into_response()
}
