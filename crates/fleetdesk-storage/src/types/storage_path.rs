//! Object keys inside the attachment bucket.

use std::fmt;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Kind of record an attachment belongs to.
///
/// Used as the first segment of entity storage paths, and serialized with
/// that same plural spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, EnumString, strum::Display, Serialize, Deserialize)]
pub enum EntityKind {
    /// Incident reports.
    #[strum(to_string = "incidents", serialize = "incident")]
    #[serde(rename = "incidents", alias = "incident")]
    Incident,
    /// Registered fleet vehicles.
    #[strum(to_string = "vehicles", serialize = "vehicle")]
    #[serde(rename = "vehicles", alias = "vehicle")]
    Vehicle,
    /// Admin users.
    #[strum(to_string = "users", serialize = "user")]
    #[serde(rename = "users", alias = "user")]
    User,
}

/// Key locating an object within the attachment bucket.
///
/// Paths are caller-constructed and not validated here; the backend
/// rejects keys it cannot store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoragePath(String);

impl StoragePath {
    /// Wraps a caller-built key.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Builds `<entity-type>/<entity-id>/<filename>`.
    pub fn for_entity(kind: EntityKind, id: impl fmt::Display, file_name: &str) -> Self {
        Self(format!("{}/{id}/{file_name}", kind.as_ref()))
    }

    /// Builds the prefix `<entity-type>/<entity-id>/` for batch uploads.
    pub fn entity_prefix(kind: EntityKind, id: impl fmt::Display) -> String {
        format!("{}/{id}/", kind.as_ref())
    }

    /// Concatenates `prefix` and `file_name` verbatim.
    ///
    /// No separator is inserted, so prefixes normally end with `/`.
    pub fn join(prefix: &str, file_name: &str) -> Self {
        Self(format!("{prefix}{file_name}"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StoragePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StoragePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for StoragePath {
    fn from(path: String) -> Self {
        Self(path)
    }
}
