//! Filesystem port for local file I/O.

use std::path::Path;

use super::PortResult;

/// Reads trigger payloads and configuration files, writes generated artifacts.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`super::PortError::NotFound`] if the file does not exist,
    /// [`super::PortError::Upstream`] for any other I/O or encoding failure.
    fn read_to_string(&self, path: &Path) -> PortResult<String>;

    /// Writes the given contents to a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> PortResult<()>;
}
