//! Unified object-store client backed by [`object_store::ObjectStore`].
//!
//! [`ObjectStoreClient`] is a thin, cloneable wrapper around
//! `Arc<dyn ObjectStore>` that provides convenience methods for the
//! operations attachment storage needs. Every public method is instrumented
//! with [`tracing`].

use std::sync::Arc;

use bytes::Bytes;
use object_store::path::Path;
use object_store::{Attribute, ObjectMeta, ObjectStore, PutPayload};

use crate::types::Error;

mod get_output;
mod put_request;

pub use get_output::GetOutput;
pub use put_request::PutRequest;

/// Label attached to errors raised by the underlying store.
const ERROR_LABEL: &str = "object-store";

/// Cloneable handle to any [`ObjectStore`] backend (S3, in-memory, ...).
///
/// All methods accept human-readable string keys and convert them to
/// [`object_store::path::Path`] internally, so the stored key is the
/// percent-encoded form returned by [`ObjectStoreClient::stored_key`].
#[derive(Clone, Debug)]
pub struct ObjectStoreClient(pub Arc<dyn ObjectStore>);

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation.
    pub fn new(store: impl ObjectStore) -> Self {
        Self(Arc::new(store))
    }

    /// Key the backend actually stores for `key`.
    ///
    /// Empty segments are dropped and characters object stores reject
    /// (`[`, `#`, `%`, ...) are percent-encoded.
    pub fn stored_key(key: &str) -> Path {
        Path::from(key)
    }

    /// Verify that the backing store is reachable.
    ///
    /// Issues a HEAD for a probe key. A not-found response is treated as
    /// success (the bucket exists), any other error is propagated.
    #[tracing::instrument(name = "object.verify", skip(self))]
    pub async fn verify_reachable(&self) -> Result<(), Error> {
        match self.head("_fleetdesk_verify_probe").await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Retrieve the raw bytes, attributes, and metadata stored at `key`.
    #[tracing::instrument(name = "object.get", skip(self))]
    pub async fn get(&self, key: &str) -> Result<GetOutput, Error> {
        let path = Self::stored_key(key);
        let result = self.0.get(&path).await.map_err(from_object_store)?;
        let meta = result.meta.clone();
        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string());
        let cache_control = result
            .attributes
            .get(&Attribute::CacheControl)
            .map(|v| v.to_string());
        let data = result.bytes().await.map_err(from_object_store)?;
        Ok(GetOutput {
            data,
            content_type,
            cache_control,
            meta,
        })
    }

    /// Upload `data` to `key` with the attributes in `request`, replacing
    /// any existing object.
    #[tracing::instrument(
        name = "object.put_opts",
        skip(self, data, request),
        fields(size = data.len())
    )]
    pub async fn put_opts(
        &self,
        key: &str,
        data: Bytes,
        request: PutRequest,
    ) -> Result<(), Error> {
        let path = Self::stored_key(key);
        let payload = PutPayload::from(data);
        self.0
            .put_opts(&path, payload, request.into())
            .await
            .map_err(from_object_store)?;
        Ok(())
    }

    /// Get object metadata without downloading the body.
    #[tracing::instrument(name = "object.head", skip(self))]
    pub async fn head(&self, key: &str) -> Result<ObjectMeta, Error> {
        let path = Self::stored_key(key);
        self.0.head(&path).await.map_err(from_object_store)
    }

    /// Delete the object at `key`.
    #[tracing::instrument(name = "object.delete", skip(self))]
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        let path = Self::stored_key(key);
        self.0.delete(&path).await.map_err(from_object_store)
    }
}

/// Convert an [`object_store::Error`] into a crate [`Error`].
fn from_object_store(err: object_store::Error) -> Error {
    let not_found = matches!(err, object_store::Error::NotFound { .. });
    let error = Error::runtime(err.to_string(), ERROR_LABEL).with_source(err);
    if not_found {
        error.with_not_found()
    } else {
        error
    }
}

#[cfg(test)]
mod tests {
    use object_store::memory::InMemory;

    use super::*;

    fn test_client() -> ObjectStoreClient {
        ObjectStoreClient::new(InMemory::new())
    }

    #[tokio::test]
    async fn put_and_get() {
        let client = test_client();
        let data = Bytes::from("hello world");
        let request = PutRequest::overwrite().with_content_type("text/plain");
        client
            .put_opts("test.txt", data.clone(), request)
            .await
            .unwrap();

        let result = client.get("test.txt").await.unwrap();
        assert_eq!(result.data, data);
        assert_eq!(result.content_type.as_deref(), Some("text/plain"));
        assert_eq!(result.cache_control, None);
    }

    #[tokio::test]
    async fn put_opts_stores_cache_control() {
        let client = test_client();
        let request = PutRequest::overwrite()
            .with_content_type("image/png")
            .with_cache_control("max-age=3600");
        client
            .put_opts("vehicles/1/photo.png", Bytes::from("png"), request)
            .await
            .unwrap();

        let result = client.get("vehicles/1/photo.png").await.unwrap();
        assert_eq!(result.content_type.as_deref(), Some("image/png"));
        assert_eq!(result.cache_control.as_deref(), Some("max-age=3600"));
    }

    #[tokio::test]
    async fn overwrite_replaces_content() {
        let client = test_client();
        for body in ["first", "second"] {
            client
                .put_opts("doc.txt", Bytes::from(body), PutRequest::overwrite())
                .await
                .unwrap();
        }

        let result = client.get("doc.txt").await.unwrap();
        assert_eq!(result.data, Bytes::from("second"));
    }

    #[tokio::test]
    async fn head() {
        let client = test_client();
        client
            .put_opts("head.bin", Bytes::from("data"), PutRequest::overwrite())
            .await
            .unwrap();

        let meta = client.head("head.bin").await.unwrap();
        assert_eq!(meta.size, 4);
        assert_eq!(meta.location, Path::from("head.bin"));
    }

    #[tokio::test]
    async fn head_not_found() {
        let client = test_client();
        let err = client.head("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("[object-store] "));
    }

    #[tokio::test]
    async fn delete() {
        let client = test_client();
        client
            .put_opts("del.bin", Bytes::from("x"), PutRequest::overwrite())
            .await
            .unwrap();
        client.delete("del.bin").await.unwrap();

        let err = client.get("del.bin").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn stored_key_is_percent_encoded() {
        let client = test_client();
        let key = "incidents/1/foto[1]#100%.jpg";
        client
            .put_opts(key, Bytes::from("x"), PutRequest::overwrite())
            .await
            .unwrap();

        let meta = client.head(key).await.unwrap();
        assert_eq!(
            meta.location.as_ref(),
            "incidents/1/foto%5B1%5D%23100%25.jpg"
        );
        assert_eq!(ObjectStoreClient::stored_key(key), meta.location);
    }

    #[tokio::test]
    async fn verify_reachable() {
        let client = test_client();
        client.verify_reachable().await.unwrap();
    }
}
