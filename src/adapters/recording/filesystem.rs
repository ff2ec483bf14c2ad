//! Recording adapter for the `FileSystem` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{FileSystem, PortResult};

/// Records filesystem interactions while delegating to an inner implementation.
pub struct RecordingFileSystem {
    inner: Box<dyn FileSystem>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingFileSystem {
    /// Creates a new recording filesystem wrapping the given implementation.
    pub fn new(inner: Box<dyn FileSystem>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct PathInput<'a> {
    path: &'a str,
}

#[derive(Serialize)]
struct WriteInput<'a> {
    path: &'a str,
    contents: &'a str,
}

impl FileSystem for RecordingFileSystem {
    fn read_to_string(&self, path: &Path) -> PortResult<String> {
        let result = self.inner.read_to_string(path);
        let input = PathInput { path: &path.display().to_string() };
        record_result(&self.recorder, "fs", "read_to_string", &input, &result);
        result
    }

    fn write(&self, path: &Path, contents: &str) -> PortResult<()> {
        let result = self.inner.write(path, contents);
        let input = WriteInput { path: &path.display().to_string(), contents };
        record_result(&self.recorder, "fs", "write", &input, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;
    use crate::cassette::format::Cassette;

    #[test]
    fn records_reads_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("response.json");
        std::fs::write(&data, "{}").unwrap();
        let cassette_path = dir.path().join("fs.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "test")));

        {
            let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&recorder));
            assert_eq!(fs.read_to_string(&data).unwrap(), "{}");
            assert!(fs.read_to_string(&dir.path().join("missing.json")).is_err());
        }

        Arc::try_unwrap(recorder).unwrap().into_inner().unwrap().finish().unwrap();
        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&cassette_path).unwrap()).unwrap();

        assert_eq!(cassette.interactions.len(), 2);
        assert_eq!(cassette.interactions[0].output, serde_json::json!({"Ok": "{}"}));
        assert!(cassette.interactions[1].output["Err"].get("NotFound").is_some());
    }
}
