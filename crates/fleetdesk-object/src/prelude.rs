//! Convenience re-exports.

pub use crate::client::{GetOutput, ObjectStoreClient, PutRequest};
pub use crate::providers::{Client, S3Credentials, S3Provider};
pub use crate::types::Error;
