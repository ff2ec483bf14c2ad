//! Recording adapters that capture interactions to cassettes.

pub mod blob_store;
pub mod clock;
pub mod filesystem;
pub mod mailer;
pub mod object_store;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::ports::PortResult;

pub use blob_store::RecordingBlobStore;
pub use clock::RecordingClock;
pub use filesystem::RecordingFileSystem;
pub use mailer::RecordingMailer;
pub use object_store::RecordingObjectStore;

/// Record an interaction with a plain (non-Result) return value.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input_json = serde_json::to_value(input).expect("failed to serialize recording input");
    let output_json = serde_json::to_value(output).expect("failed to serialize recording output");

    let mut guard = recorder.lock().expect("recorder lock poisoned");
    guard.record(port, method, input_json, output_json);
}

/// Record a port result.
///
/// `Ok(v)` is stored as `{"Ok": v}` and `Err(e)` as `{"Err": e}`, where
/// `e` keeps its `PortError` variant so replay reproduces the error kind.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &PortResult<T>,
) where
    T: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::json!({ "Ok": v }),
        Err(e) => serde_json::json!({ "Err": e }),
    };
    record_interaction(recorder, port, method, input, &output);
}
