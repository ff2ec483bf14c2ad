//! Recording adapter for the `BlobStore` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{BlobStore, PortFuture, TransientFile};

/// Records transient-store interactions while delegating to an inner store.
pub struct RecordingBlobStore {
    inner: Box<dyn BlobStore>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingBlobStore {
    /// Creates a new recording blob store wrapping the given implementation.
    pub fn new(inner: Box<dyn BlobStore>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct IdInput<'a> {
    id: &'a str,
}

impl BlobStore for RecordingBlobStore {
    fn fetch<'a>(&'a self, id: &'a str) -> PortFuture<'a, TransientFile> {
        Box::pin(async move {
            let result = self.inner.fetch(id).await;
            record_result(&self.recorder, "blobs", "fetch", &IdInput { id }, &result);
            result
        })
    }

    fn delete<'a>(&'a self, id: &'a str) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.delete(id).await;
            record_result(&self.recorder, "blobs", "delete", &IdInput { id }, &result);
            result
        })
    }
}
