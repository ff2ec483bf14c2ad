//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the onboarding workflow and an
//! external system (time, local files, transient uploads, durable object
//! storage, email). Implementations live in `src/adapters/`.

pub mod blob_store;
pub mod clock;
pub mod filesystem;
pub mod mailer;
pub mod object_store;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use blob_store::{BlobStore, TransientFile};
pub use clock::Clock;
pub use filesystem::FileSystem;
pub use mailer::{Attachment, Email, Mailer};
pub use object_store::{ObjectStore, PutObject};

/// Failure reported by a collaborator behind a port.
///
/// Serializable so that recorded cassettes replay the same failure kind.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PortError {
    /// The referenced resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The collaborator was unreachable or rejected the call.
    #[error("upstream failure: {0}")]
    Upstream(String),
}

/// Result alias for port calls.
pub type PortResult<T> = Result<T, PortError>;

/// Boxed future returned by network-facing ports; keeps the traits dyn-compatible.
pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = PortResult<T>> + Send + 'a>>;

/// Serde adapter storing byte payloads as base64 strings in cassettes.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
