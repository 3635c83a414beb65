use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::dao::storage::StorageError;

/// Failures of the roster services, independent of the transport.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The roster store failed to answer.
    #[error("roster store unavailable")]
    Unavailable(#[source] StorageError),
    /// No roster store is installed yet.
    #[error("roster store not connected (degraded mode)")]
    Degraded,
    /// A write was attempted but the store did not accept it.
    #[error("{0} was not persisted")]
    NotPersisted(String),
    /// The roster kept changing underneath a transaction.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        if err.is_conflict() {
            ServiceError::Conflict(err.to_string())
        } else {
            ServiceError::Unavailable(err)
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("invalid roster submission: {err}"))
    }
}

/// Errors rendered as `{ success: false, message }` with a matching status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(ref source) => {
                AppError::ServiceUnavailable(format!("{err}: {source}"))
            }
            ServiceError::Degraded | ServiceError::NotPersisted(_) => {
                AppError::ServiceUnavailable(err.to_string())
            }
            ServiceError::Conflict(_) => AppError::Conflict(err.to_string()),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn service_errors_map_to_status_codes() {
        assert_eq!(status_of(ServiceError::Degraded), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(ServiceError::NotPersisted("roster reset".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ServiceError::Conflict("busy".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::NotFound("player".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(StorageError::conflict(None).into()),
            StatusCode::CONFLICT
        );
    }
}
