//! Value types passed across the attachment storage API.

mod file_handle;
mod public_url;
mod storage_path;

pub use file_handle::FileHandle;
pub use public_url::PublicUrl;
pub use storage_path::{EntityKind, StoragePath};
