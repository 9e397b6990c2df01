#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for single-file uploads and removals.
pub const TRACING_TARGET_UPLOAD: &str = "fleetdesk_storage::upload";

/// Tracing target for batch uploads.
pub const TRACING_TARGET_BATCH: &str = "fleetdesk_storage::batch";

/// Tracing target for store construction and configuration.
pub const TRACING_TARGET_STORE: &str = "fleetdesk_storage::store";

mod attachments;
mod config;
mod error;
mod store;
pub mod types;

#[doc(hidden)]
pub mod prelude;

pub use attachments::Attachments;
pub use config::StorageConfig;
pub use error::{Error, Result, UploadFailure, UploadFailures};
pub use store::{AttachmentStore, BucketStore, DEFAULT_BUCKET, DEFAULT_CACHE_CONTROL_SECS};
