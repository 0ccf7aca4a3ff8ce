//! Search coordination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::matcher::Mask;
use crate::mnemonic::PhraseSource;

use super::cpu::{Worker, WorkerError, WorkerStats};
use super::monitor::StatsMonitor;

/// A winning passphrase/address pair.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The full passphrase, salt included
    pub passphrase: String,
    /// The derived address that satisfied the mask
    pub address: String,
    /// Attempts made by the winning worker
    pub attempts: u64,
    /// The ID of the worker that found this result
    pub worker_id: usize,
    /// Wall time since the winning worker started
    pub elapsed: Duration,
}

/// Coordinates a pool of search workers and the stats monitor.
///
/// Owns the shared stop flag and the result channel. Workers race freely;
/// the first result pulled off the channel is the canonical one, and any
/// later publication from a racing sibling is simply never consumed.
pub struct SearchPool {
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    monitor: Option<JoinHandle<()>>,
    result_rx: Receiver<Result<SearchResult, WorkerError>>,
    stop_flag: Arc<AtomicBool>,
    stats: Vec<Arc<WorkerStats>>,
    start_time: Instant,
}

impl SearchPool {
    /// Spawns `num_workers` workers plus the monitor and starts searching
    /// immediately. Each worker gets a clone of the phrase source and its
    /// own stats slot.
    pub fn new<S>(
        num_workers: usize,
        mask: Mask,
        source: S,
        salt: String,
        monitor_interval: Duration,
    ) -> Self
    where
        S: PhraseSource + Clone + 'static,
    {
        let num_workers = num_workers.max(1);
        // One slot per worker: every worker sends at most one message, so
        // a racing second publisher never blocks on a full channel.
        let (result_tx, result_rx) = bounded(num_workers);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats: Vec<Arc<WorkerStats>> =
            (0..num_workers).map(|_| Arc::new(WorkerStats::new())).collect();

        let handles = Self::spawn_workers(&mask, &source, &salt, result_tx, &stop_flag, &stats);
        let monitor =
            StatsMonitor::new(stats.clone(), stop_flag.clone(), monitor_interval).spawn();

        Self {
            num_workers,
            handles: Some(handles),
            monitor: Some(monitor),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        }
    }

    fn spawn_workers<S>(
        mask: &Mask,
        source: &S,
        salt: &str,
        result_tx: Sender<Result<SearchResult, WorkerError>>,
        stop_flag: &Arc<AtomicBool>,
        stats: &[Arc<WorkerStats>],
    ) -> Vec<JoinHandle<()>>
    where
        S: PhraseSource + Clone + 'static,
    {
        stats
            .iter()
            .enumerate()
            .map(|(id, slot)| {
                let worker = Worker::new(
                    id,
                    mask.clone(),
                    source.clone(),
                    salt.to_string(),
                    result_tx.clone(),
                    stop_flag.clone(),
                    slot.clone(),
                );
                let error_tx = result_tx.clone();
                let error_flag = stop_flag.clone();

                thread::Builder::new()
                    .name(format!("vanity-worker-{}", id))
                    .spawn(move || {
                        if let Err(e) = worker.run() {
                            // fatal to the run: stop siblings, surface the error
                            error_flag.store(true, Ordering::Relaxed);
                            let _ = error_tx.send(Err(e));
                        }
                    })
                    .expect("Failed to spawn worker thread")
            })
            .collect()
    }

    /// Waits for the next worker message with a timeout.
    ///
    /// Returns the winning result, a fatal worker error, or `None` if the
    /// timeout expires first.
    pub fn wait_for_result(&self, timeout: Duration) -> Option<Result<SearchResult, WorkerError>> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    /// Attempts to receive a worker message without blocking.
    pub fn try_recv(&self) -> Option<Result<SearchResult, WorkerError>> {
        self.result_rx.try_recv().ok()
    }

    /// Signals all workers and the monitor to stop. Idempotent.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once the stop flag has been raised, whether by a
    /// winning worker, a failing worker, or an external interrupt.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    /// Returns a clone of the stop flag for external use (e.g. signal
    /// handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Sum of the attempt counts last published by each worker.
    pub fn total_attempts(&self) -> u64 {
        self.stats.iter().map(|slot| slot.attempts()).sum()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average attempt rate over the pool's lifetime.
    pub fn attempts_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_attempts() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Stops the search and waits for every worker and the monitor to exit.
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
        if let Some(monitor) = self.monitor.take() {
            let _ = monitor.join();
        }
    }
}

impl Drop for SearchPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive_address;
    use crate::mnemonic::{Dictionary, MnemonicSource, PhraseError, WordCount};

    const FULL_WILDCARD: &str = "S-????-????-????-?????";
    // The address of account id 0; no random mnemonic will ever hit it.
    const UNREACHABLE: &str = "S-2222-2222-2222-22222";

    fn make_pool(mask: &str, workers: usize) -> SearchPool {
        SearchPool::new(
            workers,
            Mask::compile(mask).unwrap(),
            MnemonicSource::new(Dictionary::En, WordCount::Words12),
            String::new(),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_single_result_with_racing_workers() {
        let pool = make_pool(FULL_WILDCARD, 4);

        let result = pool
            .wait_for_result(Duration::from_secs(30))
            .expect("a full-wildcard search must produce a result")
            .expect("no worker may fail");

        assert!(result.worker_id < 4);
        assert!(result.attempts >= 1);
        assert_eq!(result.address, derive_address(&result.passphrase));
        assert!(Mask::compile(FULL_WILDCARD).unwrap().matches(&result.address));

        // all workers reach a terminal state
        pool.join();
    }

    #[test]
    fn test_interrupt_yields_no_result() {
        let pool = make_pool(UNREACHABLE, 2);
        thread::sleep(Duration::from_millis(50));

        pool.stop();
        assert!(pool.is_stopped());
        assert!(pool.wait_for_result(Duration::from_millis(500)).is_none());

        pool.join();
    }

    #[test]
    fn test_attempts_are_monotonic() {
        let pool = make_pool(UNREACHABLE, 2);

        let mut previous = 0;
        for _ in 0..4 {
            thread::sleep(Duration::from_millis(300));
            let total = pool.total_attempts();
            assert!(total >= previous, "attempt total went backwards");
            previous = total;
        }
        assert!(previous > 0, "workers never published any attempts");

        pool.join();
    }

    #[test]
    fn test_worker_failure_is_surfaced() {
        #[derive(Clone)]
        struct FailingSource;
        impl PhraseSource for FailingSource {
            fn generate(&self) -> Result<String, PhraseError> {
                Err(bip39::Error::BadWordCount(13).into())
            }
        }

        let pool = SearchPool::new(
            2,
            Mask::compile(FULL_WILDCARD).unwrap(),
            FailingSource,
            String::new(),
            Duration::from_secs(60),
        );

        let message = pool
            .wait_for_result(Duration::from_secs(5))
            .expect("the failure must reach the coordinator");
        assert!(message.is_err());
        assert!(pool.is_stopped());

        pool.join();
    }

    #[test]
    fn test_winning_result_survives_flag_observation() {
        // Observing the stop flag after a win must still allow draining the
        // result: workers send before raising the flag.
        let pool = make_pool(FULL_WILDCARD, 1);

        while !pool.is_stopped() {
            thread::sleep(Duration::from_millis(10));
        }
        let result = pool
            .try_recv()
            .or_else(|| pool.wait_for_result(Duration::from_millis(100)));
        assert!(matches!(result, Some(Ok(_))));

        pool.join();
    }
}
