use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Insufficient balance, available: {available}")]
    InsufficientBalance { available: i64 },

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Concurrent modification, please retry")]
    ConcurrentModification,

    #[error("Balance invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::InsufficientBalance { available } => {
                log::warn!("Insufficient balance, available: {available}");
                // 返回当前可用余额，客户端可据此调整提现金额
                return HttpResponse::BadRequest().json(json!({
                    "success": false,
                    "error": {
                        "code": "INSUFFICIENT_BALANCE",
                        "message": format!("Insufficient balance, available: {available}"),
                        "available_amount": available
                    }
                }));
            }
            AppError::InvalidStateTransition(msg) => {
                log::warn!("Invalid state transition: {msg}");
                (
                    actix_web::http::StatusCode::CONFLICT,
                    "INVALID_STATE_TRANSITION",
                    msg.clone(),
                )
            }
            AppError::ConcurrentModification => (
                actix_web::http::StatusCode::CONFLICT,
                "CONCURRENT_MODIFICATION",
                "Record was modified concurrently, re-read and retry".to_string(),
            ),
            AppError::InvariantViolation(msg) => {
                // 不变量被破坏属于严重故障，必须告警，绝不静默修正
                log::error!("Balance invariant violation: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INVARIANT_VIOLATION",
                    "Balance invariant violation".to_string(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::Forbidden => {
                log::warn!("Forbidden access");
                (
                    actix_web::http::StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Forbidden".to_string(),
                )
            }
            AppError::ExternalApiError(msg) => {
                log::error!("External API error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    msg.clone(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
