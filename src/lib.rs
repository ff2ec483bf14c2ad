//! Core library entry for the `cohort` CLI.
//!
//! `cohort` onboards a research experiment from a form submission: it
//! validates the uploaded configuration, moves uploads from the transient
//! drop store into object storage, generates participant identifiers and
//! mails the participant links to the researcher.

pub mod adapters;
pub mod batch;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod experiment;
pub mod form;
pub mod naming;
pub mod ports;
pub mod workflow;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are requests, not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_sanitize() {
        assert!(run(["cohort", "sanitize", "My Study!"]).is_ok());
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(run(["cohort", "--help"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        assert!(run(["cohort", "unknown"]).is_err());
    }
}
