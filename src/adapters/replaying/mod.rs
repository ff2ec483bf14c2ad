//! Replaying adapters that serve recorded interactions.

pub mod blob_store;
pub mod clock;
pub mod filesystem;
pub mod mailer;
pub mod object_store;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{PortError, PortResult};

pub use blob_store::ReplayingBlobStore;
pub use clock::ReplayingClock;
pub use filesystem::ReplayingFileSystem;
pub use mailer::ReplayingMailer;
pub use object_store::ReplayingObjectStore;

/// Take the output of the next recorded interaction for `port::method`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut replayer = replayer.lock().expect("replayer lock poisoned");
    replayer.next_interaction(port, method).output
}

/// Decode a recorded `{"Ok": v}` / `{"Err": e}` output.
///
/// A bare string under `Err` replays as [`PortError::Upstream`], so
/// hand-written cassettes can stay short.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> PortResult<T> {
    if let Some(err) = output.get("Err") {
        if let Some(msg) = err.as_str() {
            return Err(PortError::Upstream(msg.to_string()));
        }
        let err: PortError = serde_json::from_value(err.clone())
            .unwrap_or_else(|e| panic!("{context}: undecodable recorded error: {e}"));
        return Err(err);
    }
    let value = output.get("Ok").cloned().unwrap_or(serde_json::Value::Null);
    Ok(serde_json::from_value(value)
        .unwrap_or_else(|e| panic!("{context}: undecodable recorded output: {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn replays_ok_values() {
        let value: PortResult<String> = replay_result(json!({"Ok": "hi"}), "t");
        assert_eq!(value, Ok("hi".to_string()));
        let unit: PortResult<()> = replay_result(json!({"Ok": null}), "t");
        assert_eq!(unit, Ok(()));
    }

    #[test]
    fn replays_typed_and_bare_errors() {
        let typed: PortResult<()> = replay_result(json!({"Err": {"NotFound": "blob-1"}}), "t");
        assert_eq!(typed, Err(PortError::NotFound("blob-1".to_string())));
        let bare: PortResult<()> = replay_result(json!({"Err": "boom"}), "t");
        assert_eq!(bare, Err(PortError::Upstream("boom".to_string())));
    }
}
