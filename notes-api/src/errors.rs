use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::db;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // auth
    #[error("unauthorized")]
    Unauthorized,

    // resource access
    #[error("invalid_id")]
    InvalidId,
    #[error("ownership_denied")]
    OwnershipDenied,
    #[error("not_found")]
    NotFound(String),
    #[error("validation")]
    Validation(String),

    #[error(transparent)]
    DB(db::Error),

    #[error("unexpected")]
    Unexpected(String),
}

impl From<db::Error> for Error {
    fn from(error: db::Error) -> Self {
        match error {
            db::Error::NotFound(msg) => Self::NotFound(msg),
            error => Self::DB(error),
        }
    }
}

// Response

/// Every error leaves the process as `{"error": "<message>"}`.
///
/// Ownership denials and malformed ids share one message on purpose: a caller
/// probing foreign note ids must not be able to tell a bad id from somebody
/// else's note.
#[derive(Debug, Serialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        let message = match error {
            Error::Unauthorized => "Please Authenticate".into(),
            Error::InvalidId | Error::OwnershipDenied => "Invalid Note Id".into(),
            Error::NotFound(message) => message.clone(),
            Error::Validation(message) => message.clone(),
            Error::DB(_) | Error::Unexpected(_) => "Unexpected Error".into(),
        };

        Self { error: message }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::InvalidId | Error::OwnershipDenied | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DB(_) | Error::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error = Arc::new(self);

        let mut res = axum::Json(ErrorResponse::from(error.as_ref())).into_response();
        res.extensions_mut().insert(error);

        *res.status_mut() = status;
        res
    }
}

pub async fn on_error(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let error = response.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    if let Some(error) = error {
        tracing::error!("{:?}", error);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_denial_matches_malformed_id() {
        let denied = ErrorResponse::from(&Error::OwnershipDenied);
        let malformed = ErrorResponse::from(&Error::InvalidId);
        assert_eq!(denied.error, malformed.error);
        assert_eq!(
            Error::OwnershipDenied.status_code(),
            Error::InvalidId.status_code()
        );
    }

    #[test]
    fn storage_faults_never_surface_details() {
        let error = Error::Unexpected("connection lost".into());
        assert_eq!(ErrorResponse::from(&error).error, "Unexpected Error");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
