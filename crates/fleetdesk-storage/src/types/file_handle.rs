//! In-memory file supplied by the caller for upload.

use bytes::Bytes;

/// A named binary blob to upload.
///
/// The handle is cheap to clone: the bytes are reference counted and never
/// copied by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: String,
    data: Bytes,
    content_type: Option<String>,
}

impl FileHandle {
    /// Creates a file handle from a file name and its contents.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
        }
    }

    /// Attach a MIME content-type to this file.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// File name, used as the last segment of batch upload paths.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return a clone of the underlying [`Bytes`].
    pub fn to_bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// Size of the file in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the file has no content.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the content-type, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}
