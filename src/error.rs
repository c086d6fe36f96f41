//! Errors of the service shell (config, file loading, request input).
//!
//! The planning core never fails; see `models::ParseIssue` for how bad
//! schedule data is reported instead.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        match self {
            PlannerError::InvalidDate(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to load schedules").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_is_bad_request() {
        let resp = PlannerError::InvalidDate("2024-13-01".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_io_is_server_error() {
        let err = PlannerError::Io {
            path: PathBuf::from("data/gk_data.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("data/gk_data.json"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
