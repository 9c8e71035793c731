//! HTTP-facing error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::content::StoreError;
use crate::media::BlobError;

/// Errors returned by request handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnsupportedMedia(String),

    #[error("Internal error")]
    Internal(String),
}

impl SiteError {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SiteError::Conflict(_) => StatusCode::CONFLICT,
            SiteError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            SiteError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for SiteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => SiteError::NotFound(err.to_string()),
            StoreError::SlugTaken { .. } => SiteError::Conflict(err.to_string()),
            StoreError::UnknownArtist(_) | StoreError::Invalid { .. } => {
                SiteError::InvalidInput(err.to_string())
            }
            StoreError::Io(_) | StoreError::Snapshot(_) => SiteError::Internal(err.to_string()),
        }
    }
}

impl From<BlobError> for SiteError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::UnsupportedType(_) => SiteError::UnsupportedMedia(err.to_string()),
            BlobError::Empty | BlobError::InvalidFolder(_) => SiteError::InvalidInput(err.to_string()),
            BlobError::Io(_) => SiteError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let SiteError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_store_error_mapping() {
        let not_found: SiteError = StoreError::NotFound { kind: "artist", id: Uuid::nil() }.into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let taken: SiteError = StoreError::SlugTaken { kind: "news", slug: "x".into() }.into();
        assert_eq!(taken.status(), StatusCode::CONFLICT);

        let unknown: SiteError = StoreError::UnknownArtist(Uuid::nil()).into();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err: SiteError = StoreError::Io(std::io::Error::other("disk full")).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal error");
    }

    #[test]
    fn test_blob_error_mapping() {
        let err: SiteError = BlobError::UnsupportedType("text/plain".into()).into();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let err: SiteError = BlobError::Empty.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
