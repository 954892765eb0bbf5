//! Normalized error type surfaced by every public operation.
//!
//! Each variant maps onto a stable machine-readable code (see [`AppError::code`]).
//! Faults coming back from the object store are folded into
//! [`AppError::Backend`] with their original message and code preserved.

use thiserror::Error;

use crate::store::StoreError;

/// Code for a descriptor missing one of its required fields.
pub const MISSING_PARAM: &str = "MissingParam";
/// Code for missing region or credentials.
pub const MISSING_CONFIG: &str = "MISSINGCONFIG";
/// Code for a missing bucket name.
pub const MISSING_BUCKET: &str = "MISSINGBUCKET";
/// Code for a missing folder (key prefix).
pub const MISSING_FOLDER: &str = "MISSINGFOLDER";
/// Fallback code when the originating fault carries none.
pub const UNKNOWN: &str = "Unknown";

const DEFAULT_MESSAGE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid parameter - Missing {0}")]
    MissingParam(&'static str),

    #[error("Invalid parameter - Missing {0}")]
    MissingConfig(&'static str),

    #[error("Invalid parameter - Missing bucket name")]
    MissingBucket,

    #[error("Invalid parameter - Missing folder name")]
    MissingFolder,

    /// A fault raised by the object store, passed through verbatim.
    #[error("{message}")]
    Backend {
        message: String,
        code: Option<String>,
    },

    #[error("Template is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),
}

impl AppError {
    /// Wrap an arbitrary fault, defaulting the message when it is empty.
    pub fn backend(message: impl Into<String>, code: Option<String>) -> Self {
        let message = message.into();
        AppError::Backend {
            message: if message.is_empty() {
                DEFAULT_MESSAGE.to_string()
            } else {
                message
            },
            code: code.filter(|c| !c.is_empty()),
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &str {
        match self {
            AppError::MissingParam(_) => MISSING_PARAM,
            AppError::MissingConfig(_) => MISSING_CONFIG,
            AppError::MissingBucket => MISSING_BUCKET,
            AppError::MissingFolder => MISSING_FOLDER,
            AppError::Backend { code, .. } => code.as_deref().unwrap_or(UNKNOWN),
            AppError::Decode(_) | AppError::Settings(_) => UNKNOWN,
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// True for errors detected before any I/O (bad descriptor or bad config).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AppError::MissingParam(_)
                | AppError::MissingConfig(_)
                | AppError::MissingBucket
                | AppError::MissingFolder
        )
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::backend(err.message, err.code)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
