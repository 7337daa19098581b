//! Commands: compute, check, write and delete embedded checksums.
//!
//! Running a command has two strictly ordered phases. First the targets are
//! hashed (on the calling thread for a single file, on the worker pool for a
//! batch). Only then are targets processed one by one, in request order, and
//! renamed where the command calls for it.
//!
//! Delete skips hashing files without a marker. Check and Delete settle an
//! unmarked file from its name when its bytes cannot be read.

mod outcome;
mod transition;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::calculator::{ChecksumCalculator, Digests, ThreadPoolCalculator};
use crate::checksum::Checksum;
use crate::digester::{Digester, QuarterSha256Base36};
use crate::error::ChecksumError;
use crate::presenter::Presenter;
use crate::repository::{ChecksumRepository, FileRenamer, FileState};

pub use outcome::{Detail, Outcome, Status, Verdict};

/// Operation requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Compute,
    Check,
    Write,
    Delete,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Compute,
        CommandKind::Check,
        CommandKind::Write,
        CommandKind::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Compute => "compute",
            CommandKind::Check => "check",
            CommandKind::Write => "write",
            CommandKind::Delete => "delete",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ChecksumError::UnknownCommand(s.to_string()))
    }
}

/// Validated request from the input layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub kind: CommandKind,
    pub targets: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandResponse {
    /// False if at least one target ended in an error.
    pub success: bool,
}

/// Collaborators shared by every command.
#[derive(Clone)]
pub struct Services {
    pub digester: Arc<dyn Digester>,
    pub calculator: Arc<dyn ChecksumCalculator>,
    pub repository: Arc<dyn ChecksumRepository>,
    pub presenter: Arc<dyn Presenter>,
}

impl Services {
    /// SHA-256 digester, thread pool calculator and file renamer.
    /// `workers` of `None` sizes the pool to the available parallelism.
    pub fn local(presenter: Arc<dyn Presenter>, workers: Option<usize>) -> Self {
        let digester: Arc<dyn Digester> = Arc::new(QuarterSha256Base36);
        let calculator = match workers {
            Some(n) => ThreadPoolCalculator::new(Arc::clone(&digester), n),
            None => ThreadPoolCalculator::with_available_parallelism(Arc::clone(&digester)),
        };
        Services {
            digester,
            calculator: Arc::new(calculator),
            repository: Arc::new(FileRenamer),
            presenter,
        }
    }
}

/// Targets plus the collaborators to process them with.
#[derive(Clone)]
pub struct Job {
    targets: Vec<PathBuf>,
    services: Services,
}

impl Job {
    /// Duplicate targets are dropped, first occurrence kept.
    pub(crate) fn new(targets: Vec<PathBuf>, services: Services) -> Self {
        let mut seen = HashSet::new();
        let targets = targets
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        Job { targets, services }
    }

    fn digests(&self, kind: CommandKind) -> Digests {
        let repo = self.services.repository.as_ref();
        let targets: Vec<PathBuf> = if transition::hashes_unmarked(kind) {
            self.targets.clone()
        } else {
            self.targets.iter().filter(|p| repo.has_checksum(p)).cloned().collect()
        };
        match targets.as_slice() {
            [] => Digests::new(),
            [single] => {
                let mut out = Digests::new();
                out.insert(single.clone(), self.services.digester.compute_digest(single));
                out
            }
            many => self.services.calculator.compute_many(many),
        }
    }

    fn run_with(&self, kind: CommandKind, apply: Transition) -> CommandResponse {
        tracing::debug!(command = %kind, files = self.targets.len(), "running command");
        let mut digests = self.digests(kind);
        let repo = self.services.repository.as_ref();
        let mut success = true;

        for path in &self.targets {
            let outcome = process(repo, kind, path, digests.remove(path), apply);
            match outcome.error() {
                Some(err) => {
                    tracing::warn!(command = %kind, path = %path.display(), error = %err, "file failed");
                    success = false;
                }
                None => tracing::debug!(
                    command = %kind,
                    path = %path.display(),
                    verdict = %outcome.verdict,
                    "file processed"
                ),
            }
            self.services.presenter.present(&outcome);
        }

        CommandResponse { success }
    }
}

type Transition = fn(&dyn ChecksumRepository, &FileState, Checksum) -> Outcome;

/// `digest` is `None` when the target was not hashed.
fn process(
    repo: &dyn ChecksumRepository,
    kind: CommandKind,
    path: &Path,
    digest: Option<Result<Checksum, ChecksumError>>,
    apply: Transition,
) -> Outcome {
    let state = match repo.read_state(path) {
        Ok(state) => state,
        Err(e) => return Outcome::failed(path, None, e),
    };
    let err = match digest {
        Some(Ok(digest)) => return apply(repo, &state, digest),
        Some(Err(e)) => e,
        None => ChecksumError::WorkerLost {
            path: path.to_path_buf(),
        },
    };
    if let Some(outcome) = transition::without_digest(kind, &state) {
        return outcome;
    }
    let status = state.checksum().is_none().then_some(Status::NoChecksum);
    Outcome::failed(path, status, err)
}

/// A command ready to run. The variant decides the state transition.
#[derive(Clone)]
pub enum Command {
    Compute(Job),
    Check(Job),
    Write(Job),
    Delete(Job),
}

impl Command {
    pub(crate) fn new(kind: CommandKind, job: Job) -> Self {
        match kind {
            CommandKind::Compute => Command::Compute(job),
            CommandKind::Check => Command::Check(job),
            CommandKind::Write => Command::Write(job),
            CommandKind::Delete => Command::Delete(job),
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Compute(_) => CommandKind::Compute,
            Command::Check(_) => CommandKind::Check,
            Command::Write(_) => CommandKind::Write,
            Command::Delete(_) => CommandKind::Delete,
        }
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.job().targets
    }

    fn job(&self) -> &Job {
        match self {
            Command::Compute(job) | Command::Check(job) | Command::Write(job) | Command::Delete(job) => job,
        }
    }

    /// Hash all targets, then apply this command's transition to each one and
    /// hand every outcome to the presenter. Per-file errors never stop the run.
    pub fn run(&self) -> CommandResponse {
        match self {
            Command::Compute(job) => job.run_with(CommandKind::Compute, transition::compute),
            Command::Check(job) => job.run_with(CommandKind::Check, transition::check),
            Command::Write(job) => job.run_with(CommandKind::Write, transition::write),
            Command::Delete(job) => job.run_with(CommandKind::Delete, transition::delete),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("kind", &self.kind())
            .field("targets", &self.targets())
            .finish()
    }
}

#[cfg(test)]
mod tests;
