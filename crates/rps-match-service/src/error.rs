//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rps_match_core::{HostError, LedgerError, MatchError};

/// Application error type
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AppError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "unauthorized",
            message: message.to_string(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: message.to_string(),
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal",
            message: message.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({"error": self.message, "code": self.code})),
        )
            .into_response()
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        let status = match err {
            MatchError::NotAPlayer => StatusCode::FORBIDDEN,
            MatchError::InvalidChoice(_) | MatchError::CommitmentMismatch => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            MatchError::MatchFull
            | MatchError::NotJoinable
            | MatchError::WrongState { .. }
            | MatchError::AlreadyJoined
            | MatchError::AlreadyCommitted
            | MatchError::AlreadyRevealed => StatusCode::CONFLICT,
        };
        Self {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownCredential => Self::unauthorized("Unknown credential"),
            LedgerError::NameTaken(_) => Self {
                status: StatusCode::CONFLICT,
                code: "name_taken",
                message: err.to_string(),
            },
            other => {
                tracing::error!("Ledger failure: {}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "ledger_failure",
                    message: "Ledger failure".to_string(),
                }
            }
        }
    }
}

impl From<HostError> for AppError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Ledger(e) => e.into(),
            HostError::Match(e) => e.into(),
        }
    }
}
