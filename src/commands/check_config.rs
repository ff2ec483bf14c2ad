//! `cohort check-config` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::experiment::ExperimentConfig;

/// Execute the `check-config` command.
///
/// # Errors
///
/// Returns an error string if the file cannot be read or is not a valid
/// experiment configuration.
pub fn run_with_context(ctx: &ServiceContext, file: &Path) -> Result<String, String> {
    let text = ctx
        .fs
        .read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let config = ExperimentConfig::parse(&text).map_err(|e| format!("{}: {e}", file.display()))?;
    let keys = config.keys();
    Ok(format!("{}: valid ({} keys: {})", file.display(), keys.len(), keys.join(", ")))
}
