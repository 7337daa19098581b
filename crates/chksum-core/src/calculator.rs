//! Batch digest computation on a bounded pool of worker threads.
//!
//! Workers pull paths from a shared queue and send `(path, result)` back over
//! a channel. The pool lives only for the duration of one `compute_many` call
//! and every worker is joined before it returns.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;

use crate::checksum::Checksum;
use crate::digester::Digester;
use crate::error::ChecksumError;

/// Result of a batch: one entry per distinct input path.
pub type Digests = BTreeMap<PathBuf, Result<Checksum, ChecksumError>>;

/// Computes digests for many files; one failure never hides another file's result.
pub trait ChecksumCalculator: Send + Sync {
    fn compute_many(&self, paths: &[PathBuf]) -> Digests;
}

/// Thread pool calculator delegating each file to a [`Digester`].
pub struct ThreadPoolCalculator {
    digester: Arc<dyn Digester>,
    workers: usize,
}

impl ThreadPoolCalculator {
    /// Pool of at most `workers` threads (at least one).
    pub fn new(digester: Arc<dyn Digester>, workers: usize) -> Self {
        Self {
            digester,
            workers: workers.max(1),
        }
    }

    /// One worker per available CPU.
    pub fn with_available_parallelism(digester: Arc<dyn Digester>) -> Self {
        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        Self::new(digester, workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl ChecksumCalculator for ThreadPoolCalculator {
    fn compute_many(&self, paths: &[PathBuf]) -> Digests {
        let unique: BTreeSet<&PathBuf> = paths.iter().collect();
        let count = unique.len();
        let mut results = Digests::new();
        if count == 0 {
            return results;
        }

        let work: Mutex<VecDeque<PathBuf>> = Mutex::new(unique.into_iter().cloned().collect());
        let num_workers = self.workers.min(count);
        let digester = self.digester.as_ref();
        tracing::debug!(files = count, workers = num_workers, "starting digest pool");

        thread::scope(|s| {
            let (tx, rx) = mpsc::channel();
            let mut handles = Vec::with_capacity(num_workers);
            for _ in 0..num_workers {
                let tx = tx.clone();
                let work = &work;
                handles.push(s.spawn(move || loop {
                    let next = work
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pop_front();
                    let Some(path) = next else {
                        break;
                    };
                    let res = digest_guarded(digester, &path);
                    if tx.send((path, res)).is_err() {
                        break;
                    }
                }));
            }
            drop(tx);

            // Ends once every worker has exited or died.
            for (path, res) in rx {
                results.insert(path, res);
            }
            for handle in handles {
                if handle.join().is_err() {
                    tracing::error!("digest worker panicked");
                }
            }
        });

        for path in paths {
            results
                .entry(path.clone())
                .or_insert_with(|| Err(ChecksumError::WorkerLost { path: path.clone() }));
        }
        results
    }
}

/// A panicking digester costs only the path it was hashing; the worker keeps draining.
fn digest_guarded(digester: &dyn Digester, path: &Path) -> Result<Checksum, ChecksumError> {
    panic::catch_unwind(AssertUnwindSafe(|| digester.compute_digest(path))).unwrap_or_else(|_| {
        tracing::error!(path = %path.display(), "digester panicked");
        Err(ChecksumError::WorkerLost {
            path: path.to_path_buf(),
        })
    })
}
