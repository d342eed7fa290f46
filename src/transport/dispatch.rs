use {
    crate::{ProviderSlot, domain::confirmation::ConfirmationResult},
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Redirect, Response},
    },
    serde_json::json,
};

/// Outcome of a confirmation translated into an HTTP reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Redirect { location: String },
    Reply { status: StatusCode, body: serde_json::Value },
}

impl Dispatch {
    pub fn reply(status: StatusCode, error_code: &str, message: &str) -> Self {
        Dispatch::Reply {
            status,
            body: json!({ "error_code": error_code, "message": message }),
        }
    }

    pub fn unconfigured(var: &str) -> Self {
        Dispatch::reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "configuration_error",
            &format!("payment provider configuration is incomplete: {var}"),
        )
    }

    pub fn internal_error() -> Self {
        Dispatch::reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal error",
        )
    }
}

/// Map a confirmation outcome to the reply the buyer's browser receives.
///
/// Provider failures carry the provider's own code and message through to the
/// caller; everything else gets a fixed public message with no provider
/// internals in it.
pub fn dispatch(slot: &ProviderSlot, result: ConfirmationResult) -> Dispatch {
    match result {
        ConfirmationResult::Confirmed(confirmed) => match slot {
            ProviderSlot::Ready(adapter) => Dispatch::Redirect {
                location: adapter.success_redirect(&confirmed),
            },
            // A disabled provider cannot have produced a confirmation.
            ProviderSlot::Missing(_) => Dispatch::internal_error(),
        },
        ConfirmationResult::Rejected { reason } => Dispatch::reply(
            StatusCode::BAD_REQUEST,
            reason.error_code(),
            reason.public_message(),
        ),
        ConfirmationResult::ProviderError {
            code,
            message,
            http_status,
        } => {
            let status = http_status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            Dispatch::reply(status, &code, &message)
        }
        ConfirmationResult::ConfigurationError { missing } => Dispatch::unconfigured(missing),
    }
}

impl IntoResponse for Dispatch {
    fn into_response(self) -> Response {
        match self {
            Dispatch::Redirect { location } => Redirect::to(&location).into_response(),
            Dispatch::Reply { status, body } => (status, Json(body)).into_response(),
        }
    }
}
