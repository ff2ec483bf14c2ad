//! Live filesystem adapter using `std::fs`.

use std::io;
use std::path::Path;

use crate::ports::filesystem::FileSystem;
use crate::ports::{PortError, PortResult};

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

fn io_error(path: &Path, err: &io::Error) -> PortError {
    if err.kind() == io::ErrorKind::NotFound {
        PortError::NotFound(path.display().to_string())
    } else {
        PortError::Upstream(format!("{}: {err}", path.display()))
    }
}

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        std::fs::read_to_string(path).map_err(|e| io_error(path, &e))
    }

    fn write(&self, path: &Path, contents: &str) -> PortResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        std::fs::write(path, contents).map_err(|e| io_error(path, &e))
    }
}
