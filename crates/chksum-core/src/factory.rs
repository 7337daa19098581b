//! Builds commands from requests, wiring in the shared collaborators.

use std::path::PathBuf;

use crate::command::{Command, CommandKind, CommandRequest, Job, Services};
use crate::error::ChecksumError;

pub struct CommandFactory {
    services: Services,
}

impl CommandFactory {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Build the command for `request`. Fails before touching any file
    /// if there is nothing to process.
    pub fn create(&self, request: CommandRequest) -> Result<Command, ChecksumError> {
        if request.targets.is_empty() {
            return Err(ChecksumError::NoTargets);
        }
        Ok(Command::new(
            request.kind,
            Job::new(request.targets, self.services.clone()),
        ))
    }

    /// Like [`create`](Self::create), selecting the command by name
    /// (`compute`, `check`, `write`, `delete`).
    pub fn create_named(
        &self,
        operation: &str,
        targets: Vec<PathBuf>,
    ) -> Result<Command, ChecksumError> {
        let kind: CommandKind = operation.parse()?;
        self.create(CommandRequest { kind, targets })
    }

    /// Pick a command per file from its name alone: files carrying a marker
    /// are checked (or deleted with `delete`), the others are computed
    /// (or written with `write`). Empty groups yield no command.
    pub fn plan(
        &self,
        targets: Vec<PathBuf>,
        write: bool,
        delete: bool,
    ) -> Result<Vec<Command>, ChecksumError> {
        if targets.is_empty() {
            return Err(ChecksumError::NoTargets);
        }
        let (marked, unmarked): (Vec<PathBuf>, Vec<PathBuf>) = targets
            .into_iter()
            .partition(|p| self.services.repository.has_checksum(p));

        let marked_kind = if delete {
            CommandKind::Delete
        } else {
            CommandKind::Check
        };
        let unmarked_kind = if write {
            CommandKind::Write
        } else {
            CommandKind::Compute
        };

        let commands: Vec<Command> = [(marked_kind, marked), (unmarked_kind, unmarked)]
            .into_iter()
            .filter(|(_, files)| !files.is_empty())
            .map(|(kind, files)| Command::new(kind, Job::new(files, self.services.clone())))
            .collect();
        tracing::debug!(
            commands = ?commands.iter().map(Command::kind).collect::<Vec<_>>(),
            "planned commands"
        );
        Ok(commands)
    }
}
