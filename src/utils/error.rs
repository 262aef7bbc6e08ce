use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;

/// Duplicate key error code reported by MongoDB for unique index violations.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Duplicate(String),

    #[error("unauthorized access")]
    AuthMissing,

    #[error("unauthorized access")]
    AuthInvalid(String),

    #[error("forbidden access")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Database error")]
    StoreFailure(String),

    #[error("Failed to render document")]
    Render(String),

    #[error("Configuration error")]
    Config(String),

    #[error("Internal server error")]
    Internal(String),
}

/// Body sent to the client for every failed request.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl AppError {
    fn cause(&self) -> Option<String> {
        match self {
            AppError::AuthMissing => Some("missing bearer credential".to_string()),
            AppError::AuthInvalid(reason) | AppError::Forbidden(reason) => Some(reason.clone()),
            AppError::StoreFailure(detail)
            | AppError::Render(detail)
            | AppError::Config(detail)
            | AppError::Internal(detail) => Some(detail.clone()),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthMissing | AppError::AuthInvalid(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::StoreFailure(_)
            | AppError::Render(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let cause = self.cause();
        if status.is_server_error() {
            log::error!("❌ {}: {}", self, cause.as_deref().unwrap_or("-"));
        } else {
            log::warn!("⚠️ {} ({})", self, status.as_u16());
        }

        HttpResponse::build(status).json(ErrorBody {
            message: self.to_string(),
            cause,
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = e.kind.as_ref() {
            if write_error.code == DUPLICATE_KEY_CODE {
                return AppError::Duplicate("Document".to_string());
            }
        }
        AppError::StoreFailure(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        AppError::StoreFailure(format!("Failed to encode document: {}", e))
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(e: mongodb::bson::de::Error) -> Self {
        AppError::StoreFailure(format!("Failed to decode document: {}", e))
    }
}
