//! Error type shared by every checksum operation.

use std::path::PathBuf;
use thiserror::Error;

/// Error returned by digesting, renaming, or building commands.
///
/// Per-file variants (`Io`, `Conflict`, `Encoding`, `WorkerLost`) end up in the
/// outcome for that file; `UnknownCommand` and `NoTargets` abort the invocation.
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// File missing, unreadable or not renameable.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rename target already exists.
    #[error("cannot rename {} to {}: target exists", from.display(), to.display())]
    Conflict { from: PathBuf, to: PathBuf },

    /// Text is not a well-formed checksum.
    #[error("malformed checksum: {0:?}")]
    Parse(String),

    /// Digest could not be rendered in the marker alphabet.
    #[error("digest of {} does not fit the marker: {rendered:?}", path.display())]
    Encoding { path: PathBuf, rendered: String },

    /// The pool worker hashing this path died before reporting.
    #[error("worker hashing {} terminated unexpectedly", path.display())]
    WorkerLost { path: PathBuf },

    #[error("unknown command: {0:?} (expected compute, check, write or delete)")]
    UnknownCommand(String),

    #[error("no target files given")]
    NoTargets,
}

/// Coarse classification used by callers deciding whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Conflict,
    Parse,
    Encoding,
    WorkerLost,
    UnknownCommand,
    NoTargets,
}

impl ChecksumError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChecksumError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChecksumError::Io { .. } => ErrorKind::Io,
            ChecksumError::Conflict { .. } => ErrorKind::Conflict,
            ChecksumError::Parse(_) => ErrorKind::Parse,
            ChecksumError::Encoding { .. } => ErrorKind::Encoding,
            ChecksumError::WorkerLost { .. } => ErrorKind::WorkerLost,
            ChecksumError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            ChecksumError::NoTargets => ErrorKind::NoTargets,
        }
    }

    /// True for errors that invalidate the whole invocation rather than one file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnknownCommand | ErrorKind::NoTargets
        )
    }
}
