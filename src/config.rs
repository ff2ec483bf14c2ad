//! Runtime configuration read from the environment.
//!
//! `main` loads a `.env` file first (via `dotenvy`), so every setting can
//! live there instead of the shell. Collaborator sections are optional as a
//! whole; a partially configured section is an error.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} is not set")]
    Missing(&'static str),
    /// A variable is set but unusable.
    #[error("{var} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// What was wrong.
        reason: String,
    },
}

/// Transient upload store endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobStoreConfig {
    /// Base URL; files live under `{url}/files/{id}`.
    pub url: String,
    /// Optional bearer token.
    pub token: Option<String>,
}

/// Durable object store endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStoreConfig {
    /// Endpoint URL; objects live under `{url}/{bucket}/{key}`.
    pub url: String,
    /// Bucket name.
    pub bucket: String,
    /// Optional bearer token.
    pub token: Option<String>,
}

/// Mail service endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// URL messages are posted to.
    pub url: String,
    /// Sender address.
    pub from: String,
    /// Optional bearer token.
    pub token: Option<String>,
}

/// All settings, resolved once at startup and passed down explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Participant link endpoint (`COHORT_BASE_URL`).
    pub base_url: Option<String>,
    /// Transient upload store (`COHORT_BLOB_*`).
    pub blob_store: Option<BlobStoreConfig>,
    /// Object store (`COHORT_STORE_URL`, `COHORT_BUCKET`, `COHORT_STORE_TOKEN`).
    pub object_store: Option<ObjectStoreConfig>,
    /// Mail service (`COHORT_MAIL_*`).
    pub mail: Option<MailConfig>,
    /// Form schema override file (`COHORT_FORM_SCHEMA`).
    pub form_schema: Option<PathBuf>,
    /// Cassette recording directory (`COHORT_RECORD`).
    pub record_dir: Option<PathBuf>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a section is only partially configured or a URL
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary lookup function.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = get("COHORT_BASE_URL").map(|v| check_url("COHORT_BASE_URL", v)).transpose()?;

        let blob_store = get("COHORT_BLOB_URL")
            .map(|url| -> Result<_, ConfigError> {
                Ok(BlobStoreConfig {
                    url: check_url("COHORT_BLOB_URL", url)?,
                    token: get("COHORT_BLOB_TOKEN"),
                })
            })
            .transpose()?;

        let object_store = match (get("COHORT_STORE_URL"), get("COHORT_BUCKET")) {
            (Some(url), Some(bucket)) => Some(ObjectStoreConfig {
                url: check_url("COHORT_STORE_URL", url)?,
                bucket,
                token: get("COHORT_STORE_TOKEN"),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("COHORT_BUCKET")),
            (None, Some(_)) => return Err(ConfigError::Missing("COHORT_STORE_URL")),
            (None, None) => None,
        };

        let mail = match (get("COHORT_MAIL_URL"), get("COHORT_MAIL_FROM")) {
            (Some(url), Some(from)) => Some(MailConfig {
                url: check_url("COHORT_MAIL_URL", url)?,
                from,
                token: get("COHORT_MAIL_TOKEN"),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("COHORT_MAIL_FROM")),
            (None, Some(_)) => return Err(ConfigError::Missing("COHORT_MAIL_URL")),
            (None, None) => None,
        };

        Ok(Self {
            base_url,
            blob_store,
            object_store,
            mail,
            form_schema: get("COHORT_FORM_SCHEMA").map(PathBuf::from),
            record_dir: get("COHORT_RECORD").map(PathBuf::from),
        })
    }

    /// The participant link endpoint, required for onboarding.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `COHORT_BASE_URL` is unset.
    pub fn require_base_url(&self) -> Result<&str, ConfigError> {
        self.base_url.as_deref().ok_or(ConfigError::Missing("COHORT_BASE_URL"))
    }
}

fn check_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    url::Url::parse(&value)
        .map(|_| value)
        .map_err(|e| ConfigError::Invalid { var, reason: e.to_string() })
}
