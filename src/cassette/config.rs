//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Per-port cassette file paths. Ports without a path fall back to the
/// defaults documented on `ServiceContext::replaying_from`.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Clock port cassette.
    pub clock: Option<PathBuf>,
    /// Filesystem port cassette.
    pub fs: Option<PathBuf>,
    /// Transient blob store cassette.
    pub blobs: Option<PathBuf>,
    /// Object store cassette.
    pub objects: Option<PathBuf>,
    /// Mailer cassette.
    pub mail: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the filesystem port.
    pub fs: Option<CassetteReplayer>,
    /// Replayer for the blob store port.
    pub blobs: Option<CassetteReplayer>,
    /// Replayer for the object store port.
    pub objects: Option<CassetteReplayer>,
    /// Replayer for the mailer port.
    pub mail: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Config for a directory written by a recording session
    /// (`<port>.cassette.yaml` per port). Missing files are skipped.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self {
            clock: existing("clock"),
            fs: existing("fs"),
            blobs: existing("blobs"),
            objects: existing("objects"),
            mail: existing("mail"),
        }
    }

    /// Load a cassette file and create a replayer over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette = Cassette::from_yaml(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load all configured cassette files.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &Option<PathBuf>| path.as_deref().map(Self::load).transpose();
        Ok(PortReplayers {
            clock: load(&self.clock)?,
            fs: load(&self.fs)?,
            blobs: load(&self.blobs)?,
            objects: load(&self.objects)?,
            mail: load(&self.mail)?,
        })
    }
}
