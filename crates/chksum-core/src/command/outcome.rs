//! Per-file result of running a command.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::checksum::Checksum;
use crate::error::ChecksumError;

/// Checksum status of a file, derived from its name and current bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    NoChecksum,
    ValidChecksum,
    InvalidChecksum,
}

impl Status {
    /// Compare the embedded checksum (if any) with a freshly computed one.
    pub fn derive(embedded: Option<&Checksum>, actual: &Checksum) -> Self {
        match embedded {
            None => Status::NoChecksum,
            Some(c) if c == actual => Status::ValidChecksum,
            Some(_) => Status::InvalidChecksum,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::NoChecksum => "no-checksum",
            Status::ValidChecksum => "valid",
            Status::InvalidChecksum => "invalid",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Digest reported, nothing compared or renamed.
    Shown,
    /// Embedded checksum matches the contents.
    Ok,
    /// Embedded checksum does not match the contents.
    Fail,
    /// Checksum embedded in the name.
    Added,
    /// Checksum removed from the name.
    Deleted,
    /// Write found the correct checksum already embedded.
    Unchanged,
    /// Delete found no checksum to remove.
    Nothing,
    Error,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Shown => "shown",
            Verdict::Ok => "ok",
            Verdict::Fail => "fail",
            Verdict::Added => "added",
            Verdict::Deleted => "deleted",
            Verdict::Unchanged => "unchanged",
            Verdict::Nothing => "nothing",
            Verdict::Error => "error",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest side of an [`Outcome`].
#[derive(Debug)]
pub enum Detail {
    /// Freshly computed digest of the current bytes.
    Digest(Checksum),
    /// Not hashed: the unmarked name alone decided the outcome.
    NameOnly,
    /// Why the file could not be processed.
    Error(ChecksumError),
}

/// Outcome record handed to the presenter, one per target path.
#[derive(Debug)]
pub struct Outcome {
    pub path: PathBuf,
    /// Set when the file was renamed.
    pub new_path: Option<PathBuf>,
    /// `None` when the status could not be determined.
    pub previous: Option<Status>,
    pub resulting: Option<Status>,
    pub verdict: Verdict,
    pub detail: Detail,
}

impl Outcome {
    pub(crate) fn unchanged(path: &Path, status: Status, verdict: Verdict, digest: Checksum) -> Self {
        Outcome {
            path: path.to_path_buf(),
            new_path: None,
            previous: Some(status),
            resulting: Some(status),
            verdict,
            detail: Detail::Digest(digest),
        }
    }

    pub(crate) fn renamed(
        path: &Path,
        new_path: PathBuf,
        previous: Status,
        resulting: Status,
        verdict: Verdict,
        digest: Checksum,
    ) -> Self {
        Outcome {
            path: path.to_path_buf(),
            new_path: Some(new_path),
            previous: Some(previous),
            resulting: Some(resulting),
            verdict,
            detail: Detail::Digest(digest),
        }
    }

    pub(crate) fn failed(path: &Path, status: Option<Status>, err: ChecksumError) -> Self {
        Outcome {
            path: path.to_path_buf(),
            new_path: None,
            previous: status,
            resulting: status,
            verdict: Verdict::Error,
            detail: Detail::Error(err),
        }
    }

    /// Unmarked file settled from its name, without reading the bytes.
    pub(crate) fn name_only(path: &Path, verdict: Verdict) -> Self {
        Outcome {
            path: path.to_path_buf(),
            new_path: None,
            previous: Some(Status::NoChecksum),
            resulting: Some(Status::NoChecksum),
            verdict,
            detail: Detail::NameOnly,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.detail, Detail::Error(_))
    }

    /// Where the file lives now.
    pub fn current_path(&self) -> &Path {
        self.new_path.as_deref().unwrap_or(&self.path)
    }

    pub fn digest(&self) -> Option<&Checksum> {
        match &self.detail {
            Detail::Digest(d) => Some(d),
            Detail::NameOnly | Detail::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ChecksumError> {
        match &self.detail {
            Detail::Error(e) => Some(e),
            Detail::Digest(_) | Detail::NameOnly => None,
        }
    }
}
