//! Periodic throughput reporting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::cpu::WorkerStats;

/// Granularity at which the monitor re-checks the stop flag while waiting
/// out its poll interval.
const POLL_SLICE: Duration = Duration::from_millis(100);

/// Samples the per-worker attempt slots at a fixed interval and reports the
/// cumulative total plus the instantaneous rate since the previous sample.
///
/// Read-only over shared state; exits when the stop flag is raised.
pub struct StatsMonitor {
    stats: Vec<Arc<WorkerStats>>,
    stop_flag: Arc<AtomicBool>,
    interval: Duration,
}

impl StatsMonitor {
    pub fn new(
        stats: Vec<Arc<WorkerStats>>,
        stop_flag: Arc<AtomicBool>,
        interval: Duration,
    ) -> Self {
        Self {
            stats,
            stop_flag,
            interval,
        }
    }

    /// Spawns the monitor on its own thread.
    pub fn spawn(self) -> JoinHandle<()> {
        thread::Builder::new()
            .name("vanity-monitor".into())
            .spawn(move || self.run())
            .expect("Failed to spawn monitor thread")
    }

    fn run(&self) {
        let start = Instant::now();
        let mut last_total: u64 = 0;
        let mut last_sample = start;

        loop {
            let deadline = Instant::now() + self.interval;
            loop {
                if self.stop_flag.load(Ordering::Relaxed) {
                    return;
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::sleep(POLL_SLICE.min(deadline - now));
            }

            let total: u64 = self.stats.iter().map(|slot| slot.attempts()).sum();
            let elapsed = last_sample.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                total.saturating_sub(last_total) as f64 / elapsed
            } else {
                0.0
            };

            tracing::info!(
                "checked {} addresses ({:.0}/s, {:.0}s elapsed)",
                total,
                rate,
                start.elapsed().as_secs_f64()
            );

            last_total = total;
            last_sample = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_exits_on_stop_flag() {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let monitor = StatsMonitor::new(
            vec![Arc::new(WorkerStats::new())],
            stop_flag.clone(),
            Duration::from_secs(60),
        );
        let handle = monitor.spawn();

        stop_flag.store(true, Ordering::Relaxed);
        // must return well within one interval despite the 60s setting
        handle.join().unwrap();
    }
}
