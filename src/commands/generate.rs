//! `cohort generate` command.

use std::path::Path;

use crate::batch::generate_batch;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::naming;

/// Arguments of the `generate` command.
#[derive(Debug, Clone, Copy)]
pub struct GenerateArgs<'a> {
    /// Number of participants.
    pub count: usize,
    /// Experiment name.
    pub experiment: &'a str,
    /// Link endpoint override.
    pub base_url: Option<&'a str>,
    /// Output directory; print to stdout when absent.
    pub out_dir: Option<&'a Path>,
}

/// Execute the `generate` command.
///
/// Prints the link list, a blank line, then the manifest. With an output
/// directory, writes `<prefix>_participant_links.txt` and
/// `participant_ids.csv` there instead and reports the paths.
///
/// # Errors
///
/// Returns an error string if no base URL is available, the arguments are
/// invalid, or the files cannot be written.
pub fn run_with_context(
    ctx: &ServiceContext,
    config: &Config,
    args: &GenerateArgs<'_>,
) -> Result<String, String> {
    let base_url = match args.base_url {
        Some(url) => url,
        None => config
            .require_base_url()
            .map_err(|e| format!("no link endpoint: pass --base-url or set it ({e})"))?,
    };

    let batch = generate_batch(args.count, args.experiment, ctx.clock.as_ref())
        .map_err(|e| e.to_string())?;
    let links = batch.render_url_list(base_url);
    let manifest = batch.render_manifest();

    let Some(out_dir) = args.out_dir else {
        return Ok(format!("{links}\n\n{manifest}"));
    };

    let links_path = out_dir.join(naming::links_filename(args.experiment));
    let manifest_path = out_dir.join(naming::MANIFEST_FILENAME);
    ctx.fs
        .write(&links_path, &links)
        .map_err(|e| format!("Failed to write {}: {e}", links_path.display()))?;
    ctx.fs
        .write(&manifest_path, &manifest)
        .map_err(|e| format!("Failed to write {}: {e}", manifest_path.display()))?;

    Ok(format!(
        "{} participants\nlinks: {}\nmanifest: {}",
        batch.len(),
        links_path.display(),
        manifest_path.display()
    ))
}
