//! Participant identifier batches.
//!
//! A batch is `count` identifiers derived from
//! `SHA-256("{index}|{experiment}|{timestamp}")`, truncated to 16 lowercase
//! hex characters. The timestamp is read once per batch, so two batches for
//! the same experiment only share identifiers if they were generated in the
//! same millisecond.
//!
//! The batch is rendered into two artifacts: the participant URL list that
//! is mailed to the researcher, and the CSV manifest that tracks completion.

use std::collections::HashSet;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::ports::Clock;

/// Length of a participant identifier in hex characters (64 bits).
pub const IDENTIFIER_LEN: usize = 16;

/// Header row of the completion manifest.
pub const MANIFEST_HEADER: &str = "id,completed";

/// Completion flag every manifest row starts with.
pub const NOT_COMPLETED: &str = "False";

/// Errors raised while generating a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Non-positive count or blank experiment name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Two participants in one batch truncated to the same identifier.
    #[error("identifier collision at participant {index}: {identifier}")]
    Collision {
        /// 1-based index of the participant whose identifier repeated.
        index: usize,
        /// The repeated identifier.
        identifier: String,
    },
}

/// Identifiers generated for one experiment submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantBatch {
    experiment_name: String,
    batch_timestamp: i64,
    identifiers: Vec<String>,
}

impl ParticipantBatch {
    /// The experiment label the batch was generated for.
    #[must_use]
    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    /// Epoch milliseconds captured when the batch was generated.
    #[must_use]
    pub fn batch_timestamp(&self) -> i64 {
        self.batch_timestamp
    }

    /// Identifiers in participant order (index 1 first).
    #[must_use]
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Number of participants in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Whether the batch has no identifiers. Generated batches never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Renders one participant URL per line.
    ///
    /// Each line is `<base_url>?<encoded experiment>&<identifier>`.
    #[must_use]
    pub fn render_url_list(&self, base_url: &str) -> String {
        let experiment = encode_component(&self.experiment_name);
        self.identifiers
            .iter()
            .map(|id| format!("{base_url}?{experiment}&{id}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the completion manifest with every participant marked `False`.
    #[must_use]
    pub fn render_manifest(&self) -> String {
        std::iter::once(MANIFEST_HEADER.to_string())
            .chain(self.identifiers.iter().map(|id| format!("{id},{NOT_COMPLETED}")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Generates a batch using the clock for the batch timestamp.
///
/// # Errors
///
/// Returns [`BatchError::InvalidArgument`] when `count` is zero or the
/// experiment name is blank, and [`BatchError::Collision`] if two
/// identifiers in the batch coincide.
pub fn generate_batch(
    count: usize,
    experiment_name: &str,
    clock: &dyn Clock,
) -> Result<ParticipantBatch, BatchError> {
    validate(count, experiment_name)?;
    generate_batch_at(count, experiment_name, clock.now_millis())
}

/// Generates a batch for a fixed timestamp.
///
/// # Errors
///
/// Same as [`generate_batch`].
pub fn generate_batch_at(
    count: usize,
    experiment_name: &str,
    batch_timestamp: i64,
) -> Result<ParticipantBatch, BatchError> {
    validate(count, experiment_name)?;

    let mut seen = HashSet::with_capacity(count);
    let mut identifiers = Vec::with_capacity(count);
    for index in 1..=count {
        let identifier = participant_identifier(index, experiment_name, batch_timestamp);
        if !seen.insert(identifier.clone()) {
            return Err(BatchError::Collision { index, identifier });
        }
        identifiers.push(identifier);
    }

    debug!(experiment = experiment_name, batch_timestamp, count, "generated participant batch");

    Ok(ParticipantBatch {
        experiment_name: experiment_name.to_string(),
        batch_timestamp,
        identifiers,
    })
}

/// Derives the identifier of one participant.
///
/// The fields are joined with `|` and are not escaped.
#[must_use]
pub fn participant_identifier(index: usize, experiment_name: &str, batch_timestamp: i64) -> String {
    let input = format!("{index}|{experiment_name}|{batch_timestamp}");
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(IDENTIFIER_LEN);
    hex
}

fn validate(count: usize, experiment_name: &str) -> Result<(), BatchError> {
    if count == 0 {
        return Err(BatchError::InvalidArgument("participant count must be positive".to_string()));
    }
    if experiment_name.trim().is_empty() {
        return Err(BatchError::InvalidArgument("experiment name must not be blank".to_string()));
    }
    Ok(())
}

/// Percent-encodes a query component, spaces as `%20`.
fn encode_component(value: &str) -> String {
    // byte_serialize emits `+` for spaces and escapes literal `+` as `%2B`.
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20")
}
