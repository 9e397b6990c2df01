//! Convenience re-exports.

pub use crate::attachments::Attachments;
pub use crate::config::StorageConfig;
pub use crate::error::{Error, Result, UploadFailure, UploadFailures};
pub use crate::store::{AttachmentStore, BucketStore};
pub use crate::types::{EntityKind, FileHandle, PublicUrl, StoragePath};
