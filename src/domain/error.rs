use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation: {0}")]
    Validation(String),
}

/// Failure of an outbound call to a provider API.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
