pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;
pub mod transport;

use {crate::adapters::ProviderAdapter, crate::domain::record::RecordStore, std::sync::Arc};

/// A payment provider is either ready to confirm payments or disabled because
/// a required environment variable was absent at startup.
#[derive(Clone)]
pub enum ProviderSlot {
    Ready(Arc<dyn ProviderAdapter>),
    Missing(&'static str),
}

#[derive(Clone)]
pub struct AppState {
    pub toss: ProviderSlot,
    pub naver: ProviderSlot,
    pub store: Arc<dyn RecordStore>,
}
