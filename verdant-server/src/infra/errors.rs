use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use verdant_core::CatalogError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => Self::bad_request(msg),
            CatalogError::Conflict(msg) => Self::conflict(msg),
            CatalogError::NotFound(msg) => Self::not_found(msg),
            CatalogError::StalePlan { groups } => Self::conflict(format!(
                "Duplicate plan is out of date; scan again before applying (changed: {})",
                groups.join(", ")
            )),
            CatalogError::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "store operation failed");
                Self::internal("Store operation failed")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_http_statuses() {
        let cases = [
            (CatalogError::validation("x"), StatusCode::BAD_REQUEST),
            (CatalogError::conflict("x"), StatusCode::CONFLICT),
            (CatalogError::not_found("x"), StatusCode::NOT_FOUND),
            (
                CatalogError::StalePlan {
                    groups: vec!["Tomato|Veg|Nightshade".into()],
                },
                StatusCode::CONFLICT,
            ),
            (CatalogError::store("down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn store_failures_do_not_leak_details() {
        let err = AppError::from(CatalogError::store("password authentication failed"));
        assert_eq!(err.message, "Store operation failed");
    }
}
