//! Replaying adapter for the `BlobStore` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{BlobStore, PortFuture, TransientFile};

/// Serves recorded transient files and deletions.
pub struct ReplayingBlobStore {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingBlobStore {
    /// Creates a replaying blob store backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl BlobStore for ReplayingBlobStore {
    fn fetch<'a>(&'a self, _id: &'a str) -> PortFuture<'a, TransientFile> {
        let output = next_output(&self.replayer, "blobs", "fetch");
        Box::pin(async move { replay_result(output, "blobs::fetch") })
    }

    fn delete<'a>(&'a self, _id: &'a str) -> PortFuture<'a, ()> {
        let output = next_output(&self.replayer, "blobs", "delete");
        Box::pin(async move { replay_result(output, "blobs::delete") })
    }
}
