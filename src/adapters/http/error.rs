//! JSON error bodies and the status mapping for API errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::billing::{BillingError, WebhookError};
use crate::domain::foundation::{DomainError, ErrorCode};

/// Error payload returned by every endpoint: `{"code", "message"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorBody {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    Billing(BillingError),
    Domain(DomainError),
    Webhook(WebhookError),
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        ApiError::Billing(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        ApiError::Webhook(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Billing(err) => match err {
                BillingError::InvalidCart { .. } | BillingError::UnsupportedGateway(_) => {
                    StatusCode::BAD_REQUEST
                }
                BillingError::AlreadySubscribed { .. } => StatusCode::CONFLICT,
                BillingError::GatewayUnavailable { .. } => StatusCode::BAD_GATEWAY,
                BillingError::PlanNotFound(_) | BillingError::Infrastructure(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Domain(err) => match err.code {
                ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
                ErrorCode::OrderNotFound
                | ErrorCode::PlanNotFound
                | ErrorCode::UserNotFound
                | ErrorCode::ReferralNotFound => StatusCode::NOT_FOUND,
                ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorCode::Forbidden => StatusCode::FORBIDDEN,
                ErrorCode::Conflict | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
                ErrorCode::Timeout => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Webhook(err) => err.status_code(),
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Billing(err) => ErrorBody::new(err.code().to_string(), err.message()),
            ApiError::Domain(err) if err.is_retryable() => {
                ErrorBody::new(err.code.to_string(), "Service temporarily unavailable")
            }
            ApiError::Domain(err) => ErrorBody::new(err.code.to_string(), err.message.clone()),
            ApiError::Webhook(err) => {
                let code = match err {
                    WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => {
                        "INVALID_SIGNATURE"
                    }
                    WebhookError::ParseError(_) | WebhookError::MissingField(_) => "INVALID_PAYLOAD",
                    WebhookError::GatewayNotConfigured(_) => "UNSUPPORTED_GATEWAY",
                    WebhookError::Database(_) => "DATABASE_ERROR",
                };
                let message = match err {
                    WebhookError::Database(_) => "Temporary failure, retry later".to_string(),
                    other => other.to_string(),
                };
                ErrorBody::new(code, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        }
        (status, self.body()).into_response()
    }
}
