/// Detection error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type DetectResult<T> = Result<T, DetectError>;

/// The two kinds of failure a user can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Submit was pressed before any image was chosen
    MissingInput,
    /// Transport failure or non-success status from the service
    DetectionRequestFailed,
}

impl ErrorKind {
    /// Text shown to the user for this kind
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::MissingInput => "Please upload an image first.",
            ErrorKind::DetectionRequestFailed => "Failed to detect objects",
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum DetectError {
    #[error("no image selected")]
    MissingInput,

    #[error("detection service returned {0}")]
    Rejected(StatusCode),

    // reqwest::Error is not Clone and results travel through GUI messages
    #[error("network error: {0}")]
    Network(String),
}

impl DetectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetectError::MissingInput => ErrorKind::MissingInput,
            DetectError::Rejected(_) | DetectError::Network(_) => {
                ErrorKind::DetectionRequestFailed
            }
        }
    }
}

impl From<reqwest::Error> for DetectError {
    fn from(err: reqwest::Error) -> Self {
        DetectError::Network(err.to_string())
    }
}
