//! Unified error handling for the API.
//!
//! Provides a single `AppError` type that maps every service error onto the
//! HTTP contract. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{OrderError, UserError};
use crate::store::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// User operation failed.
    #[error(transparent)]
    User(#[from] UserError),

    /// Order operation failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Store operation failed outside a service.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::User(err) => match err {
                UserError::InvalidEmail(_)
                | UserError::WeakPassword
                | UserError::NothingToUpdate => StatusCode::BAD_REQUEST,
                // A taken email surfaces as 403, not 409.
                UserError::EmailTaken | UserError::Forbidden => StatusCode::FORBIDDEN,
                UserError::NotFound => StatusCode::NOT_FOUND,
                UserError::PasswordHash | UserError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Order(err) => match err {
                // An unresolvable product reference surfaces as 400, not 404.
                OrderError::UnknownUser
                | OrderError::EmptyProducts
                | OrderError::MissingClient
                | OrderError::InvalidProductRef(_)
                | OrderError::InvalidStatus(_)
                | OrderError::UnknownProduct(_) => StatusCode::BAD_REQUEST,
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request error");
        }

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use cantina_core::ProductId;

    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_user_validation_errors_are_bad_request() {
        assert_eq!(
            status_of(UserError::WeakPassword.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(UserError::NothingToUpdate.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_taken_email_is_forbidden() {
        assert_eq!(
            status_of(UserError::EmailTaken.into()),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_forbidden_and_not_found_users() {
        assert_eq!(
            status_of(UserError::Forbidden.into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_of(UserError::NotFound.into()), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unresolvable_product_reference_is_bad_request() {
        assert_eq!(
            status_of(OrderError::UnknownProduct(ProductId::generate()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        assert_eq!(
            status_of(OrderError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_store_failures_are_internal() {
        assert_eq!(
            status_of(StoreError::NotFound.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
