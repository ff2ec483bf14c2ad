//! Replaying adapter for the `ObjectStore` port.

use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ObjectStore, PortFuture, PutObject};

/// Serves recorded upload results.
pub struct ReplayingObjectStore {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingObjectStore {
    /// Creates a replaying object store backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ObjectStore for ReplayingObjectStore {
    fn put<'a>(&'a self, _object: &'a PutObject) -> PortFuture<'a, ()> {
        let output = next_output(&self.replayer, "objects", "put");
        Box::pin(async move { replay_result(output, "objects::put") })
    }
}
