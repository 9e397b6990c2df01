//! Error types for attachment storage.

use std::fmt;

/// Result type for all attachment storage operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Message used when the backend fails without saying why.
const UNKNOWN_ERROR: &str = "unknown error";

/// Attachment storage error.
///
/// Every variant means a backend operation failed. The display text is the
/// message callers show to users, so it carries no extra prefix.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single store operation failed; `message` is the backend's text.
    #[error("{message}")]
    Backend { message: String },

    /// One or more files of a batch upload failed.
    #[error("{0}")]
    Upload(UploadFailures),

    /// The storage configuration cannot produce a working store.
    #[error("invalid storage configuration: {reason}")]
    Config { reason: String },
}

impl Error {
    /// Creates a backend error, falling back to `"unknown error"` when the
    /// backend supplied an empty message.
    pub fn backend(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Self::Backend { message }
    }

    /// Creates a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns the per-file failures if this is a batch upload error.
    pub fn upload_failures(&self) -> Option<&UploadFailures> {
        match self {
            Self::Upload(failures) => Some(failures),
            _ => None,
        }
    }
}

impl From<fleetdesk_object::types::Error> for Error {
    fn from(err: fleetdesk_object::types::Error) -> Self {
        Self::backend(err.message())
    }
}

/// A file that could not be uploaded as part of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    /// Name of the file that failed.
    pub file_name: String,
    /// Backend message for the failure.
    pub message: String,
}

impl UploadFailure {
    /// Creates a failure record for `file_name`.
    pub fn new(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Falha ao carregar {}: {}", self.file_name, self.message)
    }
}

/// Every failure of a batch upload, in input order.
///
/// Displays as the individual failure messages joined with `"; "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFailures(Vec<UploadFailure>);

impl UploadFailures {
    /// Creates an empty failure report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one failed file.
    pub fn push(&mut self, failure: UploadFailure) {
        self.0.push(failure);
    }

    /// Returns `true` if no file failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed files.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the failures in input order.
    pub fn iter(&self) -> impl Iterator<Item = &UploadFailure> {
        self.0.iter()
    }
}

impl fmt::Display for UploadFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            failure.fmt(f)?;
        }
        Ok(())
    }
}
