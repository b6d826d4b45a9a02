//! Wire contract of the upload gateway, shared by server and client.

use crate::dataset::parse_dataset;
use crate::error::{GeopalError, Result};
use crate::models::Dataset;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "uploadFile";
pub const UPLOAD_PATH: &str = "/upload";
/// Default server-side cap on the request body.
pub const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// A finished gateway round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResponse {
    pub status: u16,
    pub body: String,
}

impl UploadResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        UploadResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Turn a gateway response into a dataset, or the error the user should see.
pub fn interpret_upload(response: &UploadResponse) -> Result<Dataset> {
    if !response.is_success() {
        return Err(GeopalError::upload_rejected(response.status));
    }
    parse_dataset(&response.body)
}

/// The gateway's acceptance check: the bytes decode as JSON and the document
/// is not `null`.
pub fn is_acceptable_json(bytes: &[u8]) -> bool {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(serde_json::Value::Null) => false,
        Ok(_) => true,
        Err(_) => false,
    }
}
