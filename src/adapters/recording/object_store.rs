//! Recording adapter for the `ObjectStore` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ObjectStore, PortFuture, PutObject};

/// Records uploads while delegating to an inner store.
pub struct RecordingObjectStore {
    inner: Box<dyn ObjectStore>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingObjectStore {
    /// Creates a new recording object store wrapping the given implementation.
    pub fn new(inner: Box<dyn ObjectStore>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ObjectStore for RecordingObjectStore {
    fn put<'a>(&'a self, object: &'a PutObject) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let result = self.inner.put(object).await;
            record_result(&self.recorder, "objects", "put", object, &result);
            result
        })
    }
}
