//! Publicly readable URL of a stored object.

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};
use url::Url;

/// URL under which an uploaded object is served.
///
/// Derived from the bucket's public base URL and the object's storage path.
/// Callers persist it next to the owning record; this crate never does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicUrl(String);

impl PublicUrl {
    /// Returns the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PublicUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Url> for PublicUrl {
    fn from(url: Url) -> Self {
        Self(url.into())
    }
}
