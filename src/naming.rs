//! Filenames and storage keys derived from experiment names.
//!
//! Every place an experiment or file name turns into a path segment goes
//! through [`sanitize`], so uploads and later lookups always agree on the key.

/// Object key suffix of the completion-tracking manifest.
pub const MANIFEST_FILENAME: &str = "participant_ids.csv";

/// Maps every character outside `[A-Za-z0-9-]` to `_` and lowercases the result.
#[must_use]
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Storage prefix that namespaces all objects of one experiment.
#[must_use]
pub fn storage_prefix(experiment_name: &str) -> String {
    sanitize(experiment_name)
}

/// Object key of the manifest for an experiment.
#[must_use]
pub fn manifest_key(experiment_name: &str) -> String {
    format!("{}/{MANIFEST_FILENAME}", storage_prefix(experiment_name))
}

/// Object key for an uploaded artifact.
///
/// The stem and the extension are sanitized on their own and joined with a
/// literal `.`, so `Config File.YAML` becomes `config_file.yaml`. A name
/// without a stem or extension is sanitized whole.
#[must_use]
pub fn artifact_key(experiment_name: &str, file_name: &str) -> String {
    format!("{}/{}", storage_prefix(experiment_name), sanitize_file_name(file_name))
}

/// Attachment filename for the participant link list.
#[must_use]
pub fn links_filename(experiment_name: &str) -> String {
    format!("{}_participant_links.txt", storage_prefix(experiment_name))
}

fn sanitize_file_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!("{}.{}", sanitize(stem), sanitize(ext))
        }
        _ => sanitize(file_name),
    }
}
