use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use stockroom_core::CoreError;

use crate::envelope::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    StoreError(String),
    #[error("Invalid action: {0} is not implemented")]
    UnsupportedAction(String),
    #[error("Server error: {0}")]
    MalformedBody(String),
}

impl AppError {
    /// Dispatched actions always answer 200 and let clients branch on
    /// `success`. Only a body that is not JSON at all is a 400.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        }
    }

    /// Maps a core failure, prefixing store failures with `context`
    /// (e.g. `Error fetching product`).
    pub fn from_core(err: CoreError, context: &str) -> Self {
        match err {
            CoreError::Store(e) => AppError::StoreError(format!("{}: {}", context, e)),
            other => other.into(),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => AppError::NotFoundError(msg),
            CoreError::Store(e) => AppError::StoreError(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::StoreError(msg) => tracing::error!("Store failure: {}", msg),
            AppError::MalformedBody(msg) => tracing::warn!("Rejected request body: {}", msg),
            _ => tracing::debug!("Request failed: {}", self),
        }

        (self.status(), Envelope::failure(self.to_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::StoreError;

    #[test]
    fn test_store_errors_carry_context() {
        let err = AppError::from_core(
            CoreError::Store(StoreError::TableMissing("Products".to_string())),
            "Error fetching product",
        );
        assert_eq!(err.to_string(), "Error fetching product: Table not found: Products");
        assert_eq!(err.status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_keeps_message() {
        let err = AppError::from_core(CoreError::NotFound("Product not found".to_string()), "ignored");
        assert!(matches!(err, AppError::NotFoundError(ref m) if m == "Product not found"));
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let err = AppError::MalformedBody("expected value at line 1 column 1".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Server error: "));
    }
}
