//! CPU worker running the generate → derive → test loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::crypto::derive_address;
use crate::matcher::Mask;
use crate::mnemonic::{PhraseError, PhraseSource};

use super::SearchResult;

/// How often a worker publishes its attempt count into its stats slot.
pub const STATS_UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// Error escalated when a worker cannot continue. Fatal to the whole run:
/// the failing worker raises the stop flag and the coordinator surfaces the
/// error instead of a result.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("worker {worker_id}: phrase source failed: {source}")]
    PhraseSource {
        worker_id: usize,
        #[source]
        source: PhraseError,
    },
}

/// Terminal state of a worker's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// This worker produced the winning result
    Found,
    /// The worker observed the stop flag and exited without a result
    Cancelled,
}

/// Per-worker attempt statistics.
///
/// Each worker is the sole writer of its own slot; the monitor reads all
/// slots. No lock is needed on either side.
#[derive(Debug, Default)]
pub struct WorkerStats {
    attempts: AtomicU64,
    updated_at_ms: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last published attempt count. Never decreases.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Worker-relative time of the last publication.
    pub fn updated_at(&self) -> Duration {
        Duration::from_millis(self.updated_at_ms.load(Ordering::Relaxed))
    }

    fn record(&self, attempts: u64, elapsed: Duration) {
        self.attempts.store(attempts, Ordering::Relaxed);
        self.updated_at_ms
            .store(elapsed.as_millis() as u64, Ordering::Relaxed);
    }
}

/// A worker that generates passphrases and tests the derived addresses
/// against the compiled mask.
pub struct Worker<S: PhraseSource> {
    id: usize,
    mask: Mask,
    source: S,
    salt: String,
    result_tx: Sender<Result<SearchResult, WorkerError>>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
}

impl<S: PhraseSource> Worker<S> {
    pub fn new(
        id: usize,
        mask: Mask,
        source: S,
        salt: String,
        result_tx: Sender<Result<SearchResult, WorkerError>>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            mask,
            source,
            salt,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the search loop until a match is found or the stop flag is set.
    ///
    /// On a match the worker sends the result before raising the stop flag,
    /// so an observer that sees the flag can always drain the winning result
    /// from the channel. A send can only fail once the coordinator is gone,
    /// in which case the result is dropped with the run.
    pub fn run(&self) -> Result<Outcome, WorkerError> {
        let start = Instant::now();
        let mut attempts: u64 = 0;
        let mut last_publish = start;

        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                self.stats.record(attempts, start.elapsed());
                return Ok(Outcome::Cancelled);
            }

            let mut passphrase = self.source.generate().map_err(|source| {
                WorkerError::PhraseSource {
                    worker_id: self.id,
                    source,
                }
            })?;
            if !self.salt.is_empty() {
                passphrase.push_str(&self.salt);
            }

            let address = derive_address(&passphrase);
            attempts += 1;

            if self.mask.matches(&address) {
                let elapsed = start.elapsed();
                self.stats.record(attempts, elapsed);
                let _ = self.result_tx.send(Ok(SearchResult {
                    passphrase,
                    address,
                    attempts,
                    worker_id: self.id,
                    elapsed,
                }));
                self.stop_flag.store(true, Ordering::Relaxed);
                return Ok(Outcome::Found);
            }

            if last_publish.elapsed() >= STATS_UPDATE_INTERVAL {
                self.stats.record(attempts, start.elapsed());
                last_publish = Instant::now();
            }
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}
