//! Error types for the engine and their mapping onto HTTP responses.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Malformed input handed to the balance engine. The caller should reject
/// the write rather than persist it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("expense #{index} is invalid: {reason}")]
    InvalidExpense { index: usize, reason: String },
    #[error("settlement #{index} is invalid: {reason}")]
    InvalidSettlement { index: usize, reason: String },
    #[error("`{name}` is not a member of this group")]
    UnknownMember { name: String },
    #[error("invalid member list: {reason}")]
    InvalidRoster { reason: String },
}

impl EngineError {
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidExpense { .. } => "invalid_expense",
            EngineError::InvalidSettlement { .. } => "invalid_settlement",
            EngineError::UnknownMember { .. } => "unknown_member",
            EngineError::InvalidRoster { .. } => "invalid_roster",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// A stored group that no longer forms a valid ledger.
    #[error("stored group `{id}` is invalid: {source}")]
    InvalidStoredGroup { id: String, source: EngineError },
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Engine(err) => err.code(),
            ApiError::Store(StoreError::NotFound(_)) => "not_found",
            ApiError::Store(StoreError::AlreadyExists(_)) => "conflict",
            ApiError::Store(_) => "internal_error",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::InvalidStoredGroup { .. } => "invalid_stored_group",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Engine(_) | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Store(_) | ApiError::InvalidStoredGroup { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ErrorBody {
            code: self.code().to_string(),
            message,
        })
    }
}
