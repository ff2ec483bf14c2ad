//! Command dispatch and handlers.

pub mod check_config;
pub mod generate;
pub mod onboard;
pub mod sanitize;

use tracing::info;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler and print its output.
///
/// When `COHORT_RECORD` is set to a directory path, all port interactions are
/// recorded to per-port cassette files in a new session directory under it.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;

    let (ctx, session) = if let Some(root) = &config.record_dir {
        let (ctx, session) = ServiceContext::recording_at(&config, root)?;
        info!(dir = %session.output_dir().display(), "recording port interactions");
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let result = dispatch_with_context(command, &ctx, &config);

    // Recorders are shared with the adapters; release them before finishing.
    drop(ctx);
    if let Some(session) = session {
        finish_recording(session)?;
    }

    println!("{}", result?);
    Ok(())
}

/// Dispatch a command with the given service context, returning its output.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<String, String> {
    match command {
        Command::Onboard { response } => onboard::run_with_context(ctx, config, response),
        Command::Generate { count, experiment, base_url, out_dir } => generate::run_with_context(
            ctx,
            config,
            &generate::GenerateArgs {
                count: *count,
                experiment,
                base_url: base_url.as_deref(),
                out_dir: out_dir.as_deref(),
            },
        ),
        Command::Sanitize { name } => Ok(sanitize::run(name)),
        Command::CheckConfig { file } => check_config::run_with_context(ctx, file),
    }
}

/// Finish a recording session and report the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
