use thiserror::Error;

/// Message shown when the gateway answers 415.
pub const INVALID_CONTENT_MESSAGE: &str = "Invalid file content.";
/// Message shown for any other failed upload.
pub const GENERIC_UPLOAD_MESSAGE: &str = "An error has occurred.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeopalError {
    /// A required init option is missing. Nothing has been constructed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The upload gateway answered with a non-2xx status.
    #[error("Upload rejected ({status}): {message}")]
    UploadRejected { status: u16, message: String },

    /// The payload could not be turned into a dataset.
    #[error("{0}")]
    MalformedDataset(String),
}

impl GeopalError {
    /// Map a failed gateway status to its user-facing rejection.
    pub fn upload_rejected(status: u16) -> Self {
        let message = match status {
            415 => INVALID_CONTENT_MESSAGE,
            _ => GENERIC_UPLOAD_MESSAGE,
        };
        GeopalError::UploadRejected {
            status,
            message: message.to_string(),
        }
    }

    /// The text handed to the notification sink.
    pub fn user_message(&self) -> String {
        match self {
            GeopalError::UploadRejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeopalError>;
