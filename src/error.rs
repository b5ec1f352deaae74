use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{
    domain::aggregates::{CartError, OrderError, ProductError, ReviewError},
    payment::GatewayError,
    store::StoreError,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid Signature")]
    InvalidSignature,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Misconfigured(&'static str),

    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidSignature => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(StoreError::Duplicate(what)) => return AppError::Conflict(format!("Duplicate {what}")).into_response(),
            AppError::Store(StoreError::InUse(what)) => return AppError::Conflict(format!("The {what} is referenced by existing orders")).into_response(),
            AppError::Misconfigured(_) | AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            AppError::Store(_) | AppError::Internal(_) => {
                error!(error = %self, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

macro_rules! validation_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for AppError {
            fn from(e: $ty) -> Self { AppError::Validation(e.to_string()) }
        })*
    };
}

validation_from!(CartError, OrderError, ProductError, validator::ValidationErrors);

impl From<ReviewError> for AppError {
    fn from(e: ReviewError) -> Self {
        match e {
            ReviewError::NotPurchased => AppError::Forbidden("You must purchase this product to review it."),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self { AppError::Internal(e.to_string()) }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self { AppError::Internal(e.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::InvalidSignature, StatusCode::BAD_REQUEST),
            (AppError::NotFound("Order"), StatusCode::NOT_FOUND),
            (AppError::Store(StoreError::Duplicate("email")), StatusCode::CONFLICT),
            (AppError::Store(StoreError::Corrupt("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Misconfigured("Razorpay keys missing"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
