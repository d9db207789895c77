use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use platform_chaos::FaultKind;
use platform_db::DbError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Shared handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a handler can hand back instead of a payload.
///
/// `NotFound` is deterministic and data driven; `Fault` is injected and
/// transient. Neither is retried here: that is the caller's job.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{detail}")]
    Fault { kind: FaultKind, detail: String },
    #[error("{0}")]
    InvalidInput(String),
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound(detail.into())
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidInput(detail.into())
    }

    /// Fault with a custom detail message.
    pub fn fault_with(kind: FaultKind, detail: impl Into<String>) -> Self {
        Self::Fault {
            kind,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Fault { kind, .. } => StatusCode::from_u16(kind.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Fault { kind, .. } => match kind {
                FaultKind::InternalError => "INTERNAL_ERROR",
                FaultKind::Unavailable => "UNAVAILABLE",
                FaultKind::GatewayTimeout => "GATEWAY_TIMEOUT",
            },
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }
}

impl From<FaultKind> for ApiError {
    fn from(kind: FaultKind) -> Self {
        Self::fault_with(kind, kind.detail())
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::InvalidLimit { .. } | DbError::InvalidOffset(_) => {
                Self::InvalidInput(value.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    detail: String,
    code: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(reason) = &self {
            error!(%reason, "request failed");
        }
        // Internal reasons stay in the log.
        let body = ErrorBody {
            detail: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
