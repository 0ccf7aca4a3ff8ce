//! Concurrent search: workers, coordinator and stats monitor.
//!
//! The search is an unordered race between N independent workers sharing
//! only a stop flag, a result channel and per-worker stats slots. The first
//! result consumed by the coordinator wins; cancellation is cooperative and
//! bounded by the loop/poll granularity.

mod cpu;
mod monitor;
mod pool;

pub use cpu::{Outcome, Worker, WorkerError, WorkerStats, STATS_UPDATE_INTERVAL};
pub use monitor::StatsMonitor;
pub use pool::{SearchPool, SearchResult};
