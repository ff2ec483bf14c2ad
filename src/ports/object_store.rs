//! Durable object storage port.

use serde::{Deserialize, Serialize};

use super::PortFuture;

/// An object to upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutObject {
    /// Object key, namespaced by the sanitized experiment name.
    pub key: String,
    /// MIME type stored with the object.
    pub mime_type: String,
    /// Object body.
    #[serde(with = "super::base64_bytes")]
    pub content: Vec<u8>,
}

impl PutObject {
    /// Builds an upload from text content.
    #[must_use]
    pub fn text(key: impl Into<String>, mime_type: impl Into<String>, content: &str) -> Self {
        Self { key: key.into(), mime_type: mime_type.into(), content: content.as_bytes().to_vec() }
    }
}

/// Uploads objects to durable storage.
pub trait ObjectStore: Send + Sync {
    /// Stores the object under its key, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the store is unreachable.
    fn put<'a>(&'a self, object: &'a PutObject) -> PortFuture<'a, ()>;
}
