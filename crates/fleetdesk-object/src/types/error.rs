//! Minimal error type for object-store operations.

use std::fmt;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// A lightweight error carrying the backend's message, the label of the
/// component that raised it, and an optional source.
pub struct Error {
    label: &'static str,
    message: String,
    source: Option<BoxedError>,
    not_found: bool,
}

impl Error {
    /// Create a runtime error, displayed as `[{label}] {msg}`.
    pub fn runtime(msg: impl fmt::Display, label: &'static str) -> Self {
        Self {
            label,
            message: msg.to_string(),
            source: None,
            not_found: false,
        }
    }

    /// Create a connection error, displayed as `[{label}] {msg}`.
    pub fn connection(msg: impl fmt::Display, label: &'static str) -> Self {
        Self::runtime(msg, label)
    }

    /// Mark this error as a missing-object error.
    pub(crate) fn with_not_found(mut self) -> Self {
        self.not_found = true;
        self
    }

    /// Attach a source error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The backend's message, without the component label.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the backend reported that the object does not exist.
    pub fn is_not_found(&self) -> bool {
        self.not_found
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.label, self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("label", &self.label)
            .field("message", &self.message)
            .field("not_found", &self.not_found)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_label() {
        let err = Error::runtime("bucket missing", "s3");
        assert_eq!(err.to_string(), "[s3] bucket missing");
        assert_eq!(err.message(), "bucket missing");
    }

    #[test]
    fn not_found_flag() {
        let err = Error::runtime("gone", "object-store").with_not_found();
        assert!(err.is_not_found());

        let err = Error::connection("timeout", "s3");
        assert!(!err.is_not_found());
    }
}
