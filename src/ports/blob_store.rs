//! Transient blob store port: where form uploads land before migration.

use serde::{Deserialize, Serialize};

use super::PortFuture;

/// A file retrieved from the transient drop location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransientFile {
    /// Identifier the form response used to reference the upload.
    pub id: String,
    /// Original filename as uploaded.
    pub name: String,
    /// MIME type reported by the store.
    pub mime_type: String,
    /// Raw file contents.
    #[serde(with = "super::base64_bytes")]
    pub content: Vec<u8>,
}

/// Retrieves and removes uploads in the transient store.
pub trait BlobStore: Send + Sync {
    /// Fetches a file by id.
    ///
    /// # Errors
    ///
    /// Returns [`super::PortError::NotFound`] when no file has this id.
    fn fetch<'a>(&'a self, id: &'a str) -> PortFuture<'a, TransientFile>;

    /// Deletes a file by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the deletion.
    fn delete<'a>(&'a self, id: &'a str) -> PortFuture<'a, ()>;
}
