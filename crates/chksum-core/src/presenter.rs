//! Output boundary: commands emit structured outcomes, presenters render them.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::checksum::Checksum;
use crate::command::{Outcome, Status, Verdict};
use crate::error::ErrorKind;

pub trait Presenter: Send + Sync {
    /// Called once per processed path, in request order.
    fn present(&self, outcome: &Outcome);
}

/// Owned, comparable copy of an [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeSummary {
    pub path: PathBuf,
    pub new_path: Option<PathBuf>,
    pub previous: Option<Status>,
    pub resulting: Option<Status>,
    pub verdict: Verdict,
    pub digest: Option<Checksum>,
    pub error: Option<ErrorKind>,
}

impl From<&Outcome> for OutcomeSummary {
    fn from(o: &Outcome) -> Self {
        OutcomeSummary {
            path: o.path.clone(),
            new_path: o.new_path.clone(),
            previous: o.previous,
            resulting: o.resulting,
            verdict: o.verdict,
            digest: o.digest().cloned(),
            error: o.error().map(|e| e.kind()),
        }
    }
}

/// Collects outcomes in memory for callers that inspect results instead of printing them.
#[derive(Debug, Default)]
pub struct MemoryPresenter {
    outcomes: Mutex<Vec<OutcomeSummary>>,
}

impl MemoryPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything presented so far.
    pub fn take(&self) -> Vec<OutcomeSummary> {
        std::mem::take(&mut *self.outcomes.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Presenter for MemoryPresenter {
    fn present(&self, outcome: &Outcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(OutcomeSummary::from(outcome));
    }
}
