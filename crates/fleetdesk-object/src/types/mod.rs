//! Types shared by the client and providers.

pub mod error;

pub use error::Error;
