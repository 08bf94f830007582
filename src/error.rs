use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Error returned by HTTP handlers. Rendered as a plain-text body, the same
/// shape the auth extractor uses for its rejections.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(e) = &self {
            error!(error = ?e, "request failed");
            return (status, "Internal server error".to_string()).into_response();
        }
        (status, self.to_string()).into_response()
    }
}

fn database_error(err: &anyhow::Error) -> Option<&dyn sqlx::error::DatabaseError> {
    err.chain().find_map(|cause| match cause.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => Some(db_err.as_ref()),
        _ => None,
    })
}

/// True when the error is a Postgres unique-constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    database_error(err).map_or(false, |e| e.is_unique_violation())
}

/// Name of the violated foreign-key constraint, when the error is one.
pub fn foreign_key_violation(err: &anyhow::Error) -> Option<&str> {
    database_error(err)
        .filter(|e| e.is_foreign_key_violation())
        .map(|e| e.constraint().unwrap_or_default())
}

/// True when a foreign-key failure points at a missing customer rather than a
/// missing recipe. Relies on Postgres' default `<table>_customer_id_fkey` names.
pub fn is_missing_customer(constraint: &str) -> bool {
    constraint.ends_with("_customer_id_fkey")
}
