//! Request-level errors and their HTTP rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::protocol::View;
use crate::store::StoreError;

/// Failures a handler hands to the generic error page.
///
/// Validation errors are not listed: create/update handlers match on them and
/// re-render their form instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("no quiz exists with id={0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AppError::NotFound(id.to_string()),
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            // Reaching here means a handler forgot to re-render its form.
            StoreError::Validation(errs) => {
                AppError::StoreUnavailable(format!("unhandled validation failure on {} field(s)", errs.len()))
            }
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(target: "quiz_backend", error = %self, "Request failed");
        } else {
            warn!(target: "quiz_backend", error = %self, "Request failed");
        }
        let view = View::Error { status: status.as_u16(), message: self.to_string() };
        (status, Json(view)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        assert_eq!(AppError::from(StoreError::NotFound(4)).status(), StatusCode::NOT_FOUND);
        let down = AppError::from(StoreError::Unavailable("db down".into()));
        assert_eq!(down.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(down.to_string(), "store unavailable: db down");
    }
}
