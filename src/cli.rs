//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `cohort`.
#[derive(Debug, Parser)]
#[command(
    name = "cohort",
    version,
    about = "Onboard research experiments and issue participant links"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a form response: migrate uploads, store the manifest, mail the links.
    Onboard {
        /// Form response JSON file.
        #[arg(long, short)]
        response: PathBuf,
    },
    /// Generate a participant batch locally without contacting any collaborator.
    Generate {
        /// Number of participants.
        #[arg(long, short)]
        count: usize,
        /// Experiment name.
        #[arg(long, short)]
        experiment: String,
        /// Link endpoint; defaults to `COHORT_BASE_URL`.
        #[arg(long)]
        base_url: Option<String>,
        /// Write the link list and manifest here instead of printing them.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the storage-safe form of a name.
    Sanitize {
        /// Name to sanitize.
        name: String,
    },
    /// Validate an experiment configuration file.
    CheckConfig {
        /// Configuration file to check.
        file: PathBuf,
    },
}
