//! Scheduler configuration.

use std::time::Duration;

/// Default per-job timeout (one hour).
///
/// A MuTect2 chunk over a few-megabase block normally finishes well inside
/// this; a chunk still running after an hour is stuck in a pathological
/// region and holding a worker slot hostage.
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 3600;

/// Fallback worker count when CPU detection fails.
pub const FALLBACK_WORKER_COUNT: usize = 8;

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Maximum number of external processes live at any instant.
    ///
    /// Values below one are treated as one.
    pub worker_count: usize,

    /// Per-job deadline; on expiry the chunk's process group is killed and
    /// the chunk is recorded as [`ChunkStatus::Timeout`](super::ChunkStatus).
    pub job_timeout: Duration,
}

impl SchedulerConfig {
    /// Creates a configuration with the given worker count and the default
    /// one-hour timeout.
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(FALLBACK_WORKER_COUNT);
        Self {
            worker_count: workers,
            job_timeout: Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_one_hour() {
        let config = SchedulerConfig::default();
        assert_eq!(config.job_timeout, Duration::from_secs(3600));
        assert!(config.worker_count >= 1);
    }

    #[test]
    fn test_with_workers_keeps_default_timeout() {
        let config = SchedulerConfig::with_workers(4);
        assert_eq!(config.worker_count, 4);
        assert_eq!(
            config.job_timeout,
            Duration::from_secs(DEFAULT_JOB_TIMEOUT_SECS)
        );
    }
}
