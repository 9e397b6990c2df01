//! Attachment storage configuration.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use fleetdesk_object::prelude::{Client, S3Credentials, S3Provider};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::TRACING_TARGET_STORE;
use crate::error::{Error, Result};
use crate::store::{BucketStore, DEFAULT_BUCKET, DEFAULT_CACHE_CONTROL_SECS};

const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings for the attachment bucket.
///
/// # Environment Variables
///
/// - `STORAGE_BUCKET` - Bucket name (default: attachments)
/// - `STORAGE_ENDPOINT` - S3-compatible endpoint URL
/// - `STORAGE_REGION` - Region (default: us-east-1)
/// - `STORAGE_ACCESS_KEY_ID` / `STORAGE_SECRET_ACCESS_KEY` - Static credentials
/// - `STORAGE_PUBLIC_URL` - Base URL objects are publicly served under
/// - `STORAGE_CACHE_CONTROL_SECS` - Cache lifetime of uploads (default: 3600)
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct StorageConfig {
    /// Bucket attachments are written to.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-bucket", env = "STORAGE_BUCKET", default_value = DEFAULT_BUCKET)
    )]
    #[serde(default = "default_bucket")]
    pub storage_bucket: String,

    /// S3-compatible endpoint URL. Uses AWS when unset.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-endpoint", env = "STORAGE_ENDPOINT")
    )]
    #[serde(default)]
    pub storage_endpoint: Option<String>,

    /// Storage region.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-region", env = "STORAGE_REGION", default_value = DEFAULT_REGION)
    )]
    #[serde(default = "default_region")]
    pub storage_region: String,

    /// Access key ID for static credentials.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-access-key-id", env = "STORAGE_ACCESS_KEY_ID")
    )]
    #[serde(default)]
    pub storage_access_key_id: Option<String>,

    /// Secret access key for static credentials.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "storage-secret-access-key",
            env = "STORAGE_SECRET_ACCESS_KEY",
            hide_env_values = true
        )
    )]
    #[serde(default)]
    pub storage_secret_access_key: Option<String>,

    /// Base URL under which bucket objects are publicly readable,
    /// e.g. `https://<project>/storage/v1/object/public`.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-public-url", env = "STORAGE_PUBLIC_URL")
    )]
    pub storage_public_url: String,

    /// Cache lifetime in seconds advertised for uploaded objects.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "storage-cache-control-secs",
            env = "STORAGE_CACHE_CONTROL_SECS",
            default_value_t = DEFAULT_CACHE_CONTROL_SECS
        )
    )]
    #[serde(default = "default_cache_control_secs")]
    pub storage_cache_control_secs: u64,
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_cache_control_secs() -> u64 {
    DEFAULT_CACHE_CONTROL_SECS
}

impl StorageConfig {
    /// Creates a configuration for the default bucket served under `public_url`.
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            storage_bucket: default_bucket(),
            storage_endpoint: None,
            storage_region: default_region(),
            storage_access_key_id: None,
            storage_secret_access_key: None,
            storage_public_url: public_url.into(),
            storage_cache_control_secs: DEFAULT_CACHE_CONTROL_SECS,
        }
    }

    /// Set the S3-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.storage_endpoint = Some(endpoint.into());
        self
    }

    /// Set the static access credentials.
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.storage_access_key_id = Some(access_key_id.into());
        self.storage_secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set the bucket name.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.storage_bucket = bucket.into();
        self
    }

    /// Parses the public base URL.
    pub fn public_url(&self) -> Result<Url> {
        let url = Url::parse(&self.storage_public_url).map_err(|e| {
            Error::config(format!(
                "public url '{}' is invalid: {e}",
                self.storage_public_url
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "public url '{url}' must use http or https"
            )));
        }

        Ok(url)
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.storage_bucket.trim().is_empty() {
            return Err(Error::config("bucket name is empty"));
        }

        if self.storage_cache_control_secs == 0 {
            return Err(Error::config("cache control lifetime must be positive"));
        }

        if self.storage_access_key_id.is_some() != self.storage_secret_access_key.is_some() {
            return Err(Error::config(
                "access key id and secret access key must be set together",
            ));
        }

        self.public_url()?;
        Ok(())
    }

    /// Credentials for the S3 provider.
    pub fn credentials(&self) -> S3Credentials {
        let mut creds = S3Credentials::new(&self.storage_bucket);
        creds.region = self.storage_region.clone();
        creds.endpoint = self.storage_endpoint.clone();
        creds.access_key_id = self.storage_access_key_id.clone();
        creds.secret_access_key = self.storage_secret_access_key.clone();
        creds
    }

    /// Validates the configuration and connects to the bucket.
    pub async fn connect(&self) -> Result<BucketStore> {
        self.validate()?;

        let provider = S3Provider::connect(&self.credentials()).await?;
        let store = BucketStore::new(
            provider.into_client(),
            &self.storage_bucket,
            self.public_url()?,
        )?
        .with_cache_max_age(self.storage_cache_control_secs);

        tracing::info!(
            target: TRACING_TARGET_STORE,
            bucket = %self.storage_bucket,
            public_url = %self.storage_public_url,
            cache_control = store.cache_control(),
            "Attachment store ready"
        );

        Ok(store)
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("storage_bucket", &self.storage_bucket)
            .field("storage_endpoint", &self.storage_endpoint)
            .field("storage_region", &self.storage_region)
            .field("storage_access_key_id", &self.storage_access_key_id)
            .field(
                "storage_secret_access_key",
                &self.storage_secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("storage_public_url", &self.storage_public_url)
            .field("storage_cache_control_secs", &self.storage_cache_control_secs)
            .finish()
    }
}
