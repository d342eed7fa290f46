use {
    axum::extract::DefaultBodyLimit,
    pay_confirm::{
        AppState, ProviderSlot,
        adapters::{naver::NaverAdapter, toss::TossAdapter},
        config::{MissingVar, NaverConfig, TossConfig},
        infra::memory::MemoryRecordStore,
        transport::routes,
    },
    std::{sync::Arc, time::Duration},
    tokio::signal,
    tower::ServiceBuilder,
    tower_http::timeout::TimeoutLayer,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    // Bounded so a hung provider cannot pin handlers open indefinitely.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build http client");

    let toss = match TossConfig::from_env() {
        Ok(config) => {
            tracing::info!("toss payments gateway configured");
            ProviderSlot::Ready(Arc::new(TossAdapter::new(http.clone(), config)))
        }
        Err(MissingVar(var)) => {
            tracing::warn!(var, "toss payments disabled, missing configuration");
            ProviderSlot::Missing(var)
        }
    };

    let naver = match NaverConfig::from_env() {
        Ok(config) => {
            tracing::info!(partner_id = %config.partner_id, "naver pay gateway configured");
            ProviderSlot::Ready(Arc::new(NaverAdapter::new(http.clone(), config)))
        }
        Err(MissingVar(var)) => {
            tracing::warn!(var, "naver pay disabled, missing configuration");
            ProviderSlot::Missing(var)
        }
    };

    let state = AppState {
        toss,
        naver,
        store: Arc::new(MemoryRecordStore::new()),
    };

    let app = routes::router(state).layer(
        ServiceBuilder::new()
            .layer(DefaultBodyLimit::max(64 * 1024)) // callbacks and intents are tiny
            .layer(TimeoutLayer::new(Duration::from_secs(30))),
    );

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    tracing::info!("listening on 0.0.0.0:3000");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
