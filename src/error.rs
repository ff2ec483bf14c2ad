//! Errors surfaced by an onboarding run.

use thiserror::Error;

use crate::batch::BatchError;
use crate::experiment::ConfigFileError;
use crate::form::FormError;
use crate::ports::PortError;

/// Abstract failure categories callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: non-positive count, blank name, unusable answer or config file.
    InvalidArgument,
    /// A required form question was not answered.
    MissingField,
    /// A referenced transient file does not exist.
    NotFound,
    /// A collaborator failed.
    UpstreamFailure,
    /// Two participants in one batch received the same identifier.
    IdentifierCollision,
}

/// Any failure that aborts an onboarding run.
#[derive(Debug, Error)]
pub enum OnboardError {
    /// The form response could not be turned into a request.
    #[error(transparent)]
    Form(#[from] FormError),
    /// The uploaded experiment configuration is invalid.
    #[error("{file}: {source}")]
    ConfigFile {
        /// Name of the offending upload.
        file: String,
        /// Why it was rejected.
        source: ConfigFileError,
    },
    /// Two uploads, or an upload and the manifest, map to the same storage key.
    #[error("{file:?} would be stored as {key}, which is already taken by {other}")]
    KeyConflict {
        /// The conflicting key.
        key: String,
        /// Name of the upload that was rejected.
        file: String,
        /// What already owns the key.
        other: String,
    },
    /// Identifier generation failed.
    #[error(transparent)]
    Batch(#[from] BatchError),
    /// A collaborator call failed.
    #[error("{step}: {source}")]
    Port {
        /// Workflow step that made the call.
        step: String,
        /// The collaborator's error.
        source: PortError,
    },
}

impl OnboardError {
    /// Wraps a port error with the step that produced it.
    pub fn port(step: impl Into<String>) -> impl FnOnce(PortError) -> Self {
        let step = step.into();
        move |source| Self::Port { step, source }
    }

    /// The abstract category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Form(FormError::MissingField { .. }) => ErrorKind::MissingField,
            Self::Form(_)
            | Self::ConfigFile { .. }
            | Self::KeyConflict { .. }
            | Self::Batch(BatchError::InvalidArgument(_)) => ErrorKind::InvalidArgument,
            Self::Batch(BatchError::Collision { .. }) => ErrorKind::IdentifierCollision,
            Self::Port { source: PortError::NotFound(_), .. } => ErrorKind::NotFound,
            Self::Port { source: PortError::Upstream(_), .. } => ErrorKind::UpstreamFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let missing = OnboardError::from(FormError::MissingField {
            field: "experiment_name",
            question: "Experiment name".to_string(),
        });
        assert_eq!(missing.kind(), ErrorKind::MissingField);

        let invalid = OnboardError::from(BatchError::InvalidArgument("x".to_string()));
        assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);

        let not_found =
            OnboardError::port("fetch config")(PortError::NotFound("blob-1".to_string()));
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(not_found.to_string(), "fetch config: not found: blob-1");

        let upstream =
            OnboardError::port("upload manifest")(PortError::Upstream("503".to_string()));
        assert_eq!(upstream.kind(), ErrorKind::UpstreamFailure);
    }
}
