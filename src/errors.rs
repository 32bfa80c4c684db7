use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ApiError {
    /// Filename extension is not in the recognized set
    #[error("Unsupported file type")]
    UnsupportedFileType,

    /// Form carried no `file` part
    #[error("Missing file field")]
    MissingFile,

    /// Body is not a readable multipart form
    #[error("Invalid multipart form: {0}")]
    InvalidForm(String),

    /// Upload exceeded the configured body limit
    #[error("File too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Reading the upload or running the extractor failed
    #[error("Error processing file: {0:#}")]
    Processing(#[source] anyhow::Error),
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedFileType => StatusCode::BAD_REQUEST,
            ApiError::MissingFile | ApiError::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse { detail: self.to_string() };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::UnsupportedFileType.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingFile.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::InvalidForm("no boundary".to_string()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::PayloadTooLarge { limit: 10 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::Processing(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_processing_detail_wraps_message() {
        let error = ApiError::Processing(anyhow::anyhow!("corrupt xref table"));
        assert_eq!(error.to_string(), "Error processing file: corrupt xref table");
    }

    #[test]
    fn test_unsupported_detail_is_fixed() {
        assert_eq!(ApiError::UnsupportedFileType.to_string(), "Unsupported file type");
    }
}
