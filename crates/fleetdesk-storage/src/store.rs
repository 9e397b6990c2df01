//! Backing store abstraction and its object-store implementation.

use async_trait::async_trait;
use fleetdesk_object::client::{ObjectStoreClient, PutRequest};
use url::Url;

use crate::TRACING_TARGET_STORE;
use crate::error::{Error, Result};
use crate::types::{FileHandle, PublicUrl, StoragePath};

/// Name of the bucket attachments are written to.
pub const DEFAULT_BUCKET: &str = "attachments";

/// Cache lifetime, in seconds, advertised for uploaded objects.
pub const DEFAULT_CACHE_CONTROL_SECS: u64 = 3600;

/// Object storage operations attachment handling relies on.
///
/// Implemented by [`BucketStore`] for real backends. Tests substitute their
/// own implementations to script failures.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Writes `file` at `path`, replacing any existing object.
    async fn put(&self, path: &StoragePath, file: &FileHandle) -> Result<()>;

    /// Resolves the public URL of the object at `path`.
    fn public_url(&self, path: &StoragePath) -> Result<PublicUrl>;

    /// Deletes the objects at `paths`.
    async fn remove(&self, paths: &[StoragePath]) -> Result<()>;

    /// Checks that the bucket is reachable.
    async fn check(&self) -> Result<()>;
}

/// A single bucket served under a public base URL.
#[derive(Debug, Clone)]
pub struct BucketStore {
    client: ObjectStoreClient,
    bucket: String,
    public_base: Url,
    cache_control: String,
}

impl BucketStore {
    /// Creates a store for `bucket` whose objects are served at
    /// `<public_base>/<bucket>/<path>`.
    pub fn new(
        client: ObjectStoreClient,
        bucket: impl Into<String>,
        public_base: Url,
    ) -> Result<Self> {
        if public_base.cannot_be_a_base() {
            return Err(Error::config(format!(
                "public url '{public_base}' cannot be used as a base"
            )));
        }

        Ok(Self {
            client,
            bucket: bucket.into(),
            public_base,
            cache_control: cache_control_directive(DEFAULT_CACHE_CONTROL_SECS),
        })
    }

    /// Overrides the cache lifetime advertised for uploaded objects.
    #[must_use]
    pub fn with_cache_max_age(mut self, secs: u64) -> Self {
        self.cache_control = cache_control_directive(secs);
        self
    }

    /// Returns the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the cache-control directive sent with every upload.
    pub fn cache_control(&self) -> &str {
        &self.cache_control
    }

    /// Returns the underlying object store client.
    pub fn client(&self) -> &ObjectStoreClient {
        &self.client
    }
}

fn cache_control_directive(secs: u64) -> String {
    format!("max-age={secs}")
}

#[async_trait]
impl AttachmentStore for BucketStore {
    async fn put(&self, path: &StoragePath, file: &FileHandle) -> Result<()> {
        let mut request = PutRequest::overwrite().with_cache_control(self.cache_control.as_str());
        if let Some(content_type) = file.content_type() {
            request = request.with_content_type(content_type);
        }

        self.client
            .put_opts(path.as_str(), file.to_bytes(), request)
            .await?;
        Ok(())
    }

    fn public_url(&self, path: &StoragePath) -> Result<PublicUrl> {
        // Address the key the backend stored, not the caller's spelling of it.
        let key = ObjectStoreClient::stored_key(path.as_str());
        let mut url = self.public_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("public url cannot be used as a base"))?
            .pop_if_empty()
            .push(&self.bucket)
            .extend(key.parts());
        Ok(url.into())
    }

    async fn remove(&self, paths: &[StoragePath]) -> Result<()> {
        for path in paths {
            self.client.delete(path.as_str()).await?;
        }
        Ok(())
    }

    async fn check(&self) -> Result<()> {
        self.client.verify_reachable().await?;
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            bucket = %self.bucket,
            "Bucket reachable"
        );
        Ok(())
    }
}
