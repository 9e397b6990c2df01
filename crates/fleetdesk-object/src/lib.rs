#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod client;
/// Client trait and object storage provider factories.
pub mod providers;
/// Shared error type.
pub mod types;

#[doc(hidden)]
pub mod prelude;

/// Tracing target for object store operations.
pub const TRACING_TARGET: &str = "fleetdesk_object";
