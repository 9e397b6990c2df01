//! S3-compatible provider using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with AWS S3, MinIO, and hosted storage services exposing an
//! S3-compatible endpoint.

use derive_more::Deref;
use object_store::RetryConfig;
use object_store::aws::AmazonS3Builder;
use serde::{Deserialize, Serialize};

use super::Client;
use crate::client::ObjectStoreClient;
use crate::types::Error;

/// Typed credentials for an S3-compatible provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// S3 bucket name.
    pub bucket: String,
    /// AWS region (defaults to `us-east-1`).
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint URL (e.g. `http://localhost:9000` for MinIO).
    /// Required for non-AWS S3-compatible services.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID for static credentials.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key for static credentials.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Session token for temporary credentials.
    #[serde(default)]
    pub session_token: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Request policy for attachment traffic: a failed request fails the call.
fn retry_config() -> RetryConfig {
    RetryConfig {
        max_retries: 0,
        ..RetryConfig::default()
    }
}

impl S3Credentials {
    /// Creates credentials for `bucket` in the default region.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }
}

/// S3-backed object storage client.
#[derive(Debug, Clone, Deref)]
pub struct S3Provider(ObjectStoreClient);

impl S3Provider {
    /// Consumes the provider, returning the underlying client.
    pub fn into_client(self) -> ObjectStoreClient {
        self.0
    }
}

impl Client for S3Provider {
    type Credentials = S3Credentials;

    const ID: &'static str = "s3";

    async fn connect(creds: &Self::Credentials) -> Result<Self, Error> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&creds.bucket)
            .with_region(&creds.region)
            .with_retry(retry_config());

        if let Some(endpoint) = &creds.endpoint {
            builder = builder.with_endpoint(endpoint);
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        if let Some(access_key) = &creds.access_key_id {
            builder = builder.with_access_key_id(access_key);
        }

        if let Some(secret_key) = &creds.secret_access_key {
            builder = builder.with_secret_access_key(secret_key);
        }

        if let Some(token) = &creds.session_token {
            builder = builder.with_token(token);
        }

        let store = builder
            .build()
            .map_err(|e| Error::connection(e.to_string(), Self::ID).with_source(e))?;

        tracing::info!(
            target: crate::TRACING_TARGET,
            bucket = %creds.bucket,
            region = %creds.region,
            endpoint = ?creds.endpoint,
            "S3 object store initialized"
        );

        Ok(Self(ObjectStoreClient::new(store)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_with_static_credentials() {
        let mut creds = S3Credentials::new("attachments");
        creds.endpoint = Some("http://localhost:9000".to_string());
        creds.access_key_id = Some("minio".to_string());
        creds.secret_access_key = Some("minio-secret".to_string());

        let provider = S3Provider::connect(&creds).await.unwrap();
        let _client: ObjectStoreClient = provider.into_client();
    }

    #[test]
    fn requests_are_not_retried() {
        assert_eq!(retry_config().max_retries, 0);
    }

    #[test]
    fn credentials_default_region() {
        let creds = S3Credentials::new("attachments");
        assert_eq!(creds.region, "us-east-1");
        assert!(creds.endpoint.is_none());
        assert!(creds.access_key_id.is_none());
    }
}
