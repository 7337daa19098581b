//! CLI for chksum.

mod commands;
mod presenter;

use anyhow::Result;
use chksum_core::config::{self, ChksumConfig, OutputFormat};
use chksum_core::CommandKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_auto, run_completions, run_single};

/// Top-level CLI for chksum.
#[derive(Debug, Parser)]
#[command(name = "chksum")]
#[command(about = "chksum: keep a content checksum in each file's name", long_about = None)]
pub struct Cli {
    /// Print one JSON object per file instead of text lines.
    #[arg(long, global = true)]
    pub json: bool,

    /// Digest worker threads for batches (default: config file, else one per CPU).
    #[arg(long, global = true, value_name = "N")]
    pub workers: Option<usize>,

    /// Read configuration from this file instead of ~/.config/chksum/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the checksum of each file without renaming anything.
    Compute {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Verify the checksum embedded in each file name against the contents.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Rename each file to embed the checksum of its current contents.
    Write {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Rename each file to remove its embedded checksum.
    Delete {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Check files that carry a checksum and compute the others.
    Auto {
        /// Write a checksum into files that have none.
        #[arg(short, long)]
        write: bool,

        /// Remove the checksum from files that have one.
        #[arg(short, long)]
        delete: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

/// Settings after merging config file and command-line flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub workers: Option<usize>,
    pub output: OutputFormat,
    pub relative_paths: bool,
}

impl Settings {
    fn merge(cfg: ChksumConfig, cli: &Cli) -> Self {
        Settings {
            workers: cli.workers.or(cfg.workers),
            output: if cli.json {
                OutputFormat::Json
            } else {
                cfg.output
            },
            relative_paths: cfg.relative_paths,
        }
    }
}

impl Cli {
    /// Parse arguments and run. Returns `false` if any file failed.
    pub fn run_from_args() -> Result<bool> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<bool> {
        if let CliCommand::Completions { shell } = self.command {
            run_completions(shell);
            return Ok(true);
        }

        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let settings = Settings::merge(cfg, &self);

        match self.command {
            CliCommand::Compute { files } => run_single(&settings, CommandKind::Compute, files),
            CliCommand::Check { files } => run_single(&settings, CommandKind::Check, files),
            CliCommand::Write { files } => run_single(&settings, CommandKind::Write, files),
            CliCommand::Delete { files } => run_single(&settings, CommandKind::Delete, files),
            CliCommand::Auto {
                write,
                delete,
                files,
            } => run_auto(&settings, files, write, delete),
            CliCommand::Completions { .. } => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests;
