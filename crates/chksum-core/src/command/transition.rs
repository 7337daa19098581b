//! One state transition per command kind.
//!
//! Each function gets the file's decoded name and its freshly computed digest;
//! the status it starts from is always recomputed, never remembered.

use crate::checksum::Checksum;
use crate::repository::{ChecksumRepository, FileState};

use super::outcome::{Outcome, Status, Verdict};
use super::CommandKind;

/// Whether `kind` needs the bytes of a file whose name carries no marker.
pub(super) fn hashes_unmarked(kind: CommandKind) -> bool {
    match kind {
        CommandKind::Compute | CommandKind::Check | CommandKind::Write => true,
        CommandKind::Delete => false,
    }
}

/// Outcome for an unmarked file whose digest is unavailable, when `kind` can
/// settle it from the name alone. `None` means the digest was required.
pub(super) fn without_digest(kind: CommandKind, state: &FileState) -> Option<Outcome> {
    if state.checksum().is_some() {
        return None;
    }
    match kind {
        CommandKind::Check => Some(Outcome::name_only(&state.path, Verdict::Shown)),
        CommandKind::Delete => Some(Outcome::name_only(&state.path, Verdict::Nothing)),
        CommandKind::Compute | CommandKind::Write => None,
    }
}

/// Report the digest, touch nothing.
pub(super) fn compute(_repo: &dyn ChecksumRepository, state: &FileState, digest: Checksum) -> Outcome {
    let status = Status::derive(state.checksum(), &digest);
    Outcome::unchanged(&state.path, status, Verdict::Shown, digest)
}

/// Compare embedded and actual digest, never rename.
pub(super) fn check(_repo: &dyn ChecksumRepository, state: &FileState, digest: Checksum) -> Outcome {
    let status = Status::derive(state.checksum(), &digest);
    let verdict = match status {
        Status::NoChecksum => Verdict::Shown,
        Status::ValidChecksum => Verdict::Ok,
        Status::InvalidChecksum => Verdict::Fail,
    };
    Outcome::unchanged(&state.path, status, verdict, digest)
}

/// Embed the actual digest, replacing a missing or stale marker.
pub(super) fn write(repo: &dyn ChecksumRepository, state: &FileState, digest: Checksum) -> Outcome {
    let status = Status::derive(state.checksum(), &digest);
    if status == Status::ValidChecksum {
        return Outcome::unchanged(&state.path, status, Verdict::Unchanged, digest);
    }
    match repo.write(&state.path, &digest) {
        Ok(new_path) => Outcome::renamed(
            &state.path,
            new_path,
            status,
            Status::ValidChecksum,
            Verdict::Added,
            digest,
        ),
        Err(e) => Outcome::failed(&state.path, Some(status), e),
    }
}

/// Strip any marker, valid or not.
pub(super) fn delete(repo: &dyn ChecksumRepository, state: &FileState, digest: Checksum) -> Outcome {
    let status = Status::derive(state.checksum(), &digest);
    if status == Status::NoChecksum {
        return Outcome::unchanged(&state.path, status, Verdict::Nothing, digest);
    }
    match repo.strip(&state.path) {
        Ok(new_path) => Outcome::renamed(
            &state.path,
            new_path,
            status,
            Status::NoChecksum,
            Verdict::Deleted,
            digest,
        ),
        Err(e) => Outcome::failed(&state.path, Some(status), e),
    }
}
