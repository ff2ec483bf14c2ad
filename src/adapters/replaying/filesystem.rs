//! Replaying adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::Mutex;

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{FileSystem, PortResult};

/// Replays recorded filesystem results.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, _path: &Path) -> PortResult<String> {
        replay_result(next_output(&self.replayer, "fs", "read_to_string"), "fs::read_to_string")
    }

    fn write(&self, _path: &Path, _contents: &str) -> PortResult<()> {
        replay_result(next_output(&self.replayer, "fs", "write"), "fs::write")
    }
}
