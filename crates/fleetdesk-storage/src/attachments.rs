//! Upload, batch upload and removal of attachments.

use crate::error::{Error, Result, UploadFailure, UploadFailures};
use crate::store::{AttachmentStore, BucketStore};
use crate::types::{FileHandle, PublicUrl, StoragePath};
use crate::{TRACING_TARGET_BATCH, TRACING_TARGET_UPLOAD};

/// Attachment operations over an injected [`AttachmentStore`].
///
/// Holds no state besides the store, so a single instance can serve any
/// number of independent calls.
#[derive(Debug, Clone)]
pub struct Attachments<S = BucketStore> {
    store: S,
}

impl<S: AttachmentStore> Attachments<S> {
    /// Creates the service on top of `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Uploads `file` to `path`, replacing any object already there, and
    /// returns its public URL.
    ///
    /// The backend's message is returned unchanged on failure. There is no
    /// retry.
    pub async fn upload_file(&self, file: &FileHandle, path: &StoragePath) -> Result<PublicUrl> {
        tracing::debug!(
            target: TRACING_TARGET_UPLOAD,
            path = %path,
            file = file.name(),
            size = file.len(),
            "Uploading file"
        );

        if let Err(err) = self.store.put(path, file).await {
            tracing::error!(
                target: TRACING_TARGET_UPLOAD,
                path = %path,
                file = file.name(),
                error = %err,
                "Upload failed"
            );
            return Err(err);
        }

        let url = self.store.public_url(path).inspect_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_UPLOAD,
                path = %path,
                error = %err,
                "Public URL resolution failed"
            );
        })?;

        tracing::info!(
            target: TRACING_TARGET_UPLOAD,
            path = %path,
            url = %url,
            "File uploaded"
        );

        Ok(url)
    }

    /// Uploads every file to `prefix + file name`, one at a time, in input
    /// order.
    ///
    /// A failing file does not stop the remaining uploads. If any file
    /// failed, the whole call fails with an [`Error::Upload`] listing every
    /// failure, and the URLs of the files that did upload are dropped.
    /// Those objects stay in the bucket.
    pub async fn upload_files(&self, files: &[FileHandle], prefix: &str) -> Result<Vec<PublicUrl>> {
        let mut urls = Vec::with_capacity(files.len());
        let mut uploaded = Vec::new();
        let mut failures = UploadFailures::new();

        for file in files {
            let path = StoragePath::join(prefix, file.name());
            match self.upload_file(file, &path).await {
                Ok(url) => {
                    urls.push(url);
                    uploaded.push(path);
                }
                Err(err) => failures.push(UploadFailure::new(file.name(), err.to_string())),
            }
        }

        if failures.is_empty() {
            tracing::info!(
                target: TRACING_TARGET_BATCH,
                prefix,
                count = urls.len(),
                "Batch upload completed"
            );
            return Ok(urls);
        }

        // TODO: return the uploaded URLs alongside the failures once the
        // admin forms can display partial results.
        tracing::warn!(
            target: TRACING_TARGET_BATCH,
            prefix,
            failed = failures.len(),
            orphaned = ?uploaded,
            "Batch upload failed, uploaded objects were kept"
        );

        Err(Error::Upload(failures))
    }

    /// Deletes the object at `path`.
    ///
    /// Returns `true` once the backend accepts the deletion. Whether a
    /// missing object is an error is up to the backend.
    pub async fn delete_file(&self, path: &StoragePath) -> Result<bool> {
        tracing::debug!(target: TRACING_TARGET_UPLOAD, path = %path, "Deleting file");

        self.store
            .remove(std::slice::from_ref(path))
            .await
            .inspect_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET_UPLOAD,
                    path = %path,
                    error = %err,
                    "Delete failed"
                );
            })?;

        tracing::info!(target: TRACING_TARGET_UPLOAD, path = %path, "File deleted");
        Ok(true)
    }

    /// Resolves the public URL of `path` without uploading anything.
    pub fn public_url(&self, path: &StoragePath) -> Result<PublicUrl> {
        self.store.public_url(path)
    }

    /// Checks that the backing bucket is reachable.
    pub async fn check(&self) -> Result<()> {
        self.store.check().await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use fleetdesk_object::client::ObjectStoreClient;
    use object_store::ObjectStore;
    use object_store::local::LocalFileSystem;
    use object_store::memory::InMemory;
    use url::Url;

    use super::*;
    use crate::store::DEFAULT_BUCKET;

    fn bucket_store() -> BucketStore {
        let base = Url::parse("https://fleet.example.com/storage/v1/object/public").unwrap();
        BucketStore::new(ObjectStoreClient::new(InMemory::new()), DEFAULT_BUCKET, base).unwrap()
    }

    /// Filesystem-backed store. It keeps no HTTP attributes, so every upload
    /// carrying a cache-control directive is rejected by `object_store`.
    fn local_store(root: &std::path::Path) -> BucketStore {
        let base = Url::parse("https://fleet.example.com/storage/v1/object/public").unwrap();
        let store = LocalFileSystem::new_with_prefix(root).unwrap();
        BucketStore::new(ObjectStoreClient::new(store), DEFAULT_BUCKET, base).unwrap()
    }

    fn url_for(path: &str) -> String {
        format!("https://fleet.example.com/storage/v1/object/public/attachments/{path}")
    }

    /// Wraps a [`BucketStore`], failing writes for chosen file names and
    /// recording the order of attempted puts.
    struct ScriptedStore {
        inner: BucketStore,
        failing: HashSet<String>,
        message: String,
        attempts: Mutex<Vec<String>>,
    }

    impl ScriptedStore {
        fn failing(names: &[&str], message: &str) -> Self {
            Self {
                inner: bucket_store(),
                failing: names.iter().map(|n| n.to_string()).collect(),
                message: message.to_string(),
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AttachmentStore for ScriptedStore {
        async fn put(&self, path: &StoragePath, file: &FileHandle) -> Result<()> {
            self.attempts.lock().unwrap().push(path.to_string());
            if self.failing.contains(file.name()) {
                return Err(Error::backend(self.message.clone()));
            }
            self.inner.put(path, file).await
        }

        fn public_url(&self, path: &StoragePath) -> Result<PublicUrl> {
            self.inner.public_url(path)
        }

        async fn remove(&self, paths: &[StoragePath]) -> Result<()> {
            self.inner.remove(paths).await
        }

        async fn check(&self) -> Result<()> {
            self.inner.check().await
        }
    }

    #[tokio::test]
    async fn upload_file_returns_public_url() {
        let attachments = Attachments::new(bucket_store());
        let path = StoragePath::new("incidents/9/scene.jpg");
        let file = FileHandle::new("scene.jpg", "jpeg").with_content_type("image/jpeg");

        let url = attachments.upload_file(&file, &path).await.unwrap();
        assert_eq!(url.as_str(), url_for("incidents/9/scene.jpg"));

        let stored = attachments.store().client().get(path.as_str()).await.unwrap();
        assert_eq!(stored.data, file.to_bytes());
        assert_eq!(stored.cache_control.as_deref(), Some("max-age=3600"));
    }

    #[tokio::test]
    async fn upload_to_same_path_overwrites() {
        let attachments = Attachments::new(bucket_store());
        let path = StoragePath::new("vehicles/3/registration.pdf");

        let first = attachments
            .upload_file(&FileHandle::new("registration.pdf", "v1"), &path)
            .await
            .unwrap();
        let second = attachments
            .upload_file(&FileHandle::new("registration.pdf", "v2"), &path)
            .await
            .unwrap();
        assert_eq!(first, second);

        let stored = attachments.store().client().get(path.as_str()).await.unwrap();
        assert_eq!(stored.data, "v2");
    }

    #[tokio::test]
    async fn upload_file_propagates_backend_message() {
        let store = ScriptedStore::failing(&["big.mp4"], "Payload too large");
        let attachments = Attachments::new(store);

        let err = attachments
            .upload_file(&FileHandle::new("big.mp4", "x"), &StoragePath::new("incidents/1/big.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Payload too large");
    }

    #[tokio::test]
    async fn upload_file_reports_object_store_error_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let attachments = Attachments::new(local_store(dir.path()));

        let err = attachments
            .upload_file(&FileHandle::new("a.pdf", "x"), &StoragePath::new("incidents/1/a.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Backend { .. }));
        assert_eq!(err.to_string(), object_store::Error::NotImplemented.to_string());

        let err = attachments
            .upload_files(&[FileHandle::new("b.pdf", "x")], "incidents/1/")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Falha ao carregar b.pdf: {}",
                object_store::Error::NotImplemented
            )
        );
    }

    #[tokio::test]
    async fn delete_file_reports_object_store_error_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let attachments = Attachments::new(local_store(dir.path()));
        let key = "vehicles/2/missing.pdf";

        let expected = LocalFileSystem::new_with_prefix(dir.path())
            .unwrap()
            .delete(&ObjectStoreClient::stored_key(key))
            .await
            .unwrap_err()
            .to_string();

        let err = attachments
            .delete_file(&StoragePath::new(key))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), expected);
        assert!(!err.to_string().starts_with("[object-store]"));
    }

    #[tokio::test]
    async fn upload_file_url_addresses_stored_object() {
        let attachments = Attachments::new(bucket_store());
        let path = StoragePath::new("incidents/1/foto[1]#100%.jpg");

        let url = attachments
            .upload_file(&FileHandle::new("foto[1]#100%.jpg", "jpeg"), &path)
            .await
            .unwrap();
        let meta = attachments.store().client().head(path.as_str()).await.unwrap();

        let last = url.as_str().rsplit('/').next().unwrap();
        let stored = meta.location.as_ref().rsplit('/').next().unwrap();
        assert_eq!(last, stored.replace('%', "%25"));
    }

    #[tokio::test]
    async fn upload_file_without_backend_message() {
        let store = ScriptedStore::failing(&["a.txt"], "");
        let attachments = Attachments::new(store);

        let err = attachments
            .upload_file(&FileHandle::new("a.txt", "x"), &StoragePath::new("a.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown error");
    }

    #[tokio::test]
    async fn upload_files_empty_batch() {
        let attachments = Attachments::new(bucket_store());
        let urls = attachments.upload_files(&[], "incidents/1/").await.unwrap();
        assert!(urls.is_empty());
    }

    #[tokio::test]
    async fn upload_files_preserves_input_order() {
        let attachments = Attachments::new(bucket_store());
        let files = [FileHandle::new("A", "a"), FileHandle::new("B", "b")];

        let urls = attachments.upload_files(&files, "incidents/5/").await.unwrap();
        let urls: Vec<_> = urls.iter().map(PublicUrl::as_str).collect();
        assert_eq!(urls, [url_for("incidents/5/A"), url_for("incidents/5/B")]);
    }

    #[tokio::test]
    async fn upload_files_fails_whole_batch_on_partial_failure() {
        let store = ScriptedStore::failing(&["B"], "permission denied");
        let attachments = Attachments::new(store);
        let files = [FileHandle::new("A", "a"), FileHandle::new("B", "b")];

        let err = attachments
            .upload_files(&files, "vehicles/2/")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Falha ao carregar B: permission denied");

        // A was written even though its URL is not returned.
        let stored = attachments.store().inner.client().get("vehicles/2/A").await.unwrap();
        assert_eq!(stored.data, "a");
    }

    #[tokio::test]
    async fn upload_files_is_not_fail_fast() {
        let store = ScriptedStore::failing(&["A", "C"], "quota exceeded");
        let attachments = Attachments::new(store);
        let files = [
            FileHandle::new("A", "a"),
            FileHandle::new("B", "b"),
            FileHandle::new("C", "c"),
        ];

        let err = attachments.upload_files(&files, "p/").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Falha ao carregar A: quota exceeded; Falha ao carregar C: quota exceeded"
        );

        let failures = err.upload_failures().unwrap();
        let names: Vec<_> = failures.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(attachments.store().attempts(), ["p/A", "p/B", "p/C"]);
    }

    #[tokio::test]
    async fn delete_file_removes_object() {
        let attachments = Attachments::new(bucket_store());
        let path = StoragePath::new("users/4/avatar.png");
        attachments
            .upload_file(&FileHandle::new("avatar.png", "png"), &path)
            .await
            .unwrap();

        assert!(attachments.delete_file(&path).await.unwrap());

        let err = attachments.store().client().get(path.as_str()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn public_url_without_upload() {
        let attachments = Attachments::new(bucket_store());
        let url = attachments
            .public_url(&StoragePath::new("vehicles/8/side.jpg"))
            .unwrap();
        assert_eq!(url.as_str(), url_for("vehicles/8/side.jpg"));
        attachments.check().await.unwrap();
    }
}
