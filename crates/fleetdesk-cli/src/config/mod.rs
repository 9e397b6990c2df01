//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── storage: StorageConfig   # Bucket, endpoint, credentials, public URL
//! └── command: Command         # upload | put | delete | url | check
//! ```
//!
//! All storage options can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

mod telemetry;

use std::process;

use anyhow::Context;
use clap::Parser;
use fleetdesk_storage::StorageConfig;

use crate::commands::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "fleetdesk")]
#[command(about = "Fleetdesk attachment storage")]
#[command(version)]
pub struct Cli {
    /// Attachment bucket configuration.
    #[clap(flatten)]
    pub storage: StorageConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so that its
    /// values act as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() -> anyhow::Result<()> {
        telemetry::init_tracing()
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.storage
            .validate()
            .context("invalid storage configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            bucket = %self.storage.storage_bucket,
            endpoint = ?self.storage.storage_endpoint,
            region = %self.storage.storage_region,
            public_url = %self.storage.storage_public_url,
            static_credentials = self.storage.storage_access_key_id.is_some(),
            cache_control_secs = self.storage.storage_cache_control_secs,
            "Storage configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
