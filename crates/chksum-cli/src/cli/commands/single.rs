//! compute / check / write / delete: one command over all files.

use anyhow::Result;
use chksum_core::{CommandKind, CommandRequest};
use std::path::PathBuf;

use super::super::Settings;

/// Run `kind` over `files`. Returns `false` if any file failed.
pub fn run_single(settings: &Settings, kind: CommandKind, files: Vec<PathBuf>) -> Result<bool> {
    let command = super::factory(settings).create(CommandRequest {
        kind,
        targets: files,
    })?;
    let response = command.run();
    tracing::info!(command = %kind, success = response.success, "command finished");
    Ok(response.success)
}
