//! Write options for [`ObjectStoreClient::put_opts`](super::ObjectStoreClient::put_opts).

use object_store::{Attribute, Attributes, PutMode, PutOptions};

/// HTTP attributes applied to a single overwriting put.
#[derive(Debug, Clone, Default)]
pub struct PutRequest {
    content_type: Option<String>,
    cache_control: Option<String>,
}

impl PutRequest {
    /// Replace any existing object at the key.
    pub fn overwrite() -> Self {
        Self::default()
    }

    /// Sets the MIME content-type stored with the object.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the cache-control directive served with the object.
    #[must_use]
    pub fn with_cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }
}

impl From<PutRequest> for PutOptions {
    fn from(req: PutRequest) -> Self {
        let mut attributes = Attributes::new();
        if let Some(ct) = req.content_type {
            attributes.insert(Attribute::ContentType, ct.into());
        }
        if let Some(cc) = req.cache_control {
            attributes.insert(Attribute::CacheControl, cc.into());
        }

        PutOptions {
            mode: PutMode::Overwrite,
            attributes,
            ..Default::default()
        }
    }
}
