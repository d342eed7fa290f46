#![allow(dead_code)]

use {
    axum::{
        Json, Router,
        body::Body,
        extract::State,
        http::{HeaderMap, Request, StatusCode},
        response::IntoResponse,
        routing::{get, post},
    },
    http_body_util::BodyExt,
    pay_confirm::{
        AppState, ProviderSlot,
        adapters::{naver::NaverAdapter, toss::TossAdapter},
        config::{NaverConfig, TossConfig},
        infra::memory::MemoryRecordStore,
        transport::routes,
    },
    serde_json::Value,
    std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    tower::ServiceExt,
};

// ── fake provider backends ──

#[derive(Clone)]
struct FakeState {
    confirm_status: StatusCode,
    confirm_body: Value,
    lookup_status: StatusCode,
    lookup_body: Value,
    key_header: &'static str,
    hits: Arc<AtomicUsize>,
    keys: Arc<Mutex<Vec<String>>>,
}

/// In-process stand-in for one provider's API. Counts confirmation calls and
/// captures the idempotency keys it was sent.
pub struct FakeProvider {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    keys: Arc<Mutex<Vec<String>>>,
}

impl FakeProvider {
    pub fn confirm_hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn idempotency_keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

async fn confirm_handler(State(state): State<FakeState>, headers: HeaderMap) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    if let Some(key) = headers.get(state.key_header).and_then(|v| v.to_str().ok()) {
        state.keys.lock().unwrap().push(key.to_string());
    }
    (state.confirm_status, Json(state.confirm_body.clone()))
}

async fn lookup_handler(State(state): State<FakeState>) -> impl IntoResponse {
    (state.lookup_status, Json(state.lookup_body.clone()))
}

async fn spawn_fake(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn fake_provider(
    confirm_route: &str,
    lookup_route: &str,
    key_header: &'static str,
    confirm_status: u16,
    confirm_body: Value,
    lookup_status: u16,
    lookup_body: Value,
) -> FakeProvider {
    let hits = Arc::new(AtomicUsize::new(0));
    let keys = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        confirm_status: StatusCode::from_u16(confirm_status).unwrap(),
        confirm_body,
        lookup_status: StatusCode::from_u16(lookup_status).unwrap(),
        lookup_body,
        key_header,
        hits: hits.clone(),
        keys: keys.clone(),
    };
    let router = Router::new()
        .route(confirm_route, post(confirm_handler))
        .route(lookup_route, get(lookup_handler))
        .with_state(state);
    let base_url = spawn_fake(router).await;
    FakeProvider {
        base_url,
        hits,
        keys,
    }
}

pub async fn fake_toss(confirm_status: u16, confirm_body: Value) -> FakeProvider {
    fake_toss_with_lookup(confirm_status, confirm_body, 200, Value::Null).await
}

pub async fn fake_toss_with_lookup(
    confirm_status: u16,
    confirm_body: Value,
    lookup_status: u16,
    lookup_body: Value,
) -> FakeProvider {
    fake_provider(
        "/v1/payments/confirm",
        "/v1/payments/orders/{order_id}",
        "Idempotency-Key",
        confirm_status,
        confirm_body,
        lookup_status,
        lookup_body,
    )
    .await
}

pub async fn fake_naver(confirm_status: u16, confirm_body: Value) -> FakeProvider {
    fake_naver_with_lookup(confirm_status, confirm_body, 200, Value::Null).await
}

pub async fn fake_naver_with_lookup(
    confirm_status: u16,
    confirm_body: Value,
    lookup_status: u16,
    lookup_body: Value,
) -> FakeProvider {
    fake_provider(
        "/naverpay/payments/v2.2/apply/payment",
        "/naverpay/payments/v2.2/list/history/{payment_id}",
        "X-NaverPay-Idempotency-Key",
        confirm_status,
        confirm_body,
        lookup_status,
        lookup_body,
    )
    .await
}

// ── application wiring ──

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap()
}

pub fn toss_slot(base_url: &str) -> ProviderSlot {
    let config = TossConfig {
        secret_key: "test_sk".to_string(),
        api_base: base_url.to_string(),
    };
    ProviderSlot::Ready(Arc::new(TossAdapter::new(http_client(), config)))
}

pub fn naver_slot(base_url: &str) -> ProviderSlot {
    let config = NaverConfig {
        client_id: "test_cid".to_string(),
        client_secret: "test_csecret".to_string(),
        chain_id: "test_chain".to_string(),
        partner_id: "test_partner".to_string(),
        api_base: base_url.to_string(),
    };
    ProviderSlot::Ready(Arc::new(NaverAdapter::new(http_client(), config)))
}

pub fn unconfigured(var: &'static str) -> ProviderSlot {
    ProviderSlot::Missing(var)
}

pub fn app(toss: ProviderSlot, naver: ProviderSlot) -> Router {
    routes::router(AppState {
        toss,
        naver,
        store: Arc::new(MemoryRecordStore::new()),
    })
}

// ── request driving ──

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

pub async fn get_uri(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        location,
        body,
    }
}
