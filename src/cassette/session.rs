//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::info;

use super::recorder::CassetteRecorder;

/// Per-port `CassetteRecorder`s writing into one timestamped directory.
pub struct RecordingSession {
    /// Recorder for clock readings.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for transient blob store interactions.
    pub blobs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for object store uploads.
    pub objects: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for outgoing mail.
    pub mail: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session writing to `<root>/<timestamp>/<port>.cassette.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory already exists or cannot
    /// be created.
    pub fn new(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"))))
        };

        Ok(Self {
            clock: make_recorder("clock"),
            fs: make_recorder("fs"),
            blobs: make_recorder("blobs"),
            objects: make_recorder("objects"),
            mail: make_recorder("mail"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write every port's cassette and return the session directory.
    ///
    /// Ports that saw no interactions produce no file.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or a file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            if recorder.is_empty() {
                return Ok(());
            }
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.clock, "clock")?;
        finish_one(self.fs, "fs")?;
        finish_one(self.blobs, "blobs")?;
        finish_one(self.objects, "objects")?;
        finish_one(self.mail, "mail")?;

        info!(dir = %self.output_dir.display(), "recording saved");
        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn writes_only_ports_that_were_used() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(root.path()).unwrap();
        assert!(session.output_dir().starts_with(root.path()));

        session.objects.lock().unwrap().record("objects", "put", json!({}), json!({"Ok": null}));

        let dir = session.finish().unwrap();
        assert!(dir.join("objects.cassette.yaml").exists());
        assert!(!dir.join("mail.cassette.yaml").exists());
    }

    #[test]
    fn outstanding_reference_blocks_finish() {
        let root = tempfile::tempdir().unwrap();
        let session = RecordingSession::new(root.path()).unwrap();
        let _held = Arc::clone(&session.mail);

        let err = session.finish().unwrap_err();
        assert!(err.contains("mail still has references"));
    }
}
