//! auto: choose check/delete or compute/write per file from its name.

use anyhow::Result;
use std::path::PathBuf;

use super::super::Settings;

/// Run every planned command, even after one fails. Returns `false` if any file failed.
pub fn run_auto(settings: &Settings, files: Vec<PathBuf>, write: bool, delete: bool) -> Result<bool> {
    let commands = super::factory(settings).plan(files, write, delete)?;
    let mut success = true;
    for command in &commands {
        let response = command.run();
        tracing::info!(command = %command.kind(), success = response.success, "command finished");
        success &= response.success;
    }
    Ok(success)
}
