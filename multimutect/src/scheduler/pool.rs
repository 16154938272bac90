//! The bounded worker pool.

use super::config::SchedulerConfig;
use super::process::run_chunk;
use super::result::{ChunkStatus, JobResult};
use crate::command::Chunk;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info};

/// Executes chunks concurrently, capped at the configured worker count.
///
/// One scheduler instance owns two pieces of shared state: the admission
/// semaphore and the log lock that serializes multi-line failure output from
/// concurrent workers. Both are created per instance and passed explicitly
/// to workers; nothing is process-global.
pub struct JobScheduler {
    config: SchedulerConfig,
    log_lock: Arc<Mutex<()>>,
}

impl JobScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            log_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Runs every chunk to a terminal [`JobResult`].
    ///
    /// Spawns one task per chunk; each task holds a semaphore permit for the
    /// lifetime of its external process, so at most `worker_count` processes
    /// are ever live. Admission order is unspecified. Returns only after
    /// every chunk has a terminal result, in ordinal order; an empty chunk
    /// list returns immediately.
    ///
    /// Per-chunk failures never cancel siblings and never propagate as
    /// errors; callers derive the run verdict from the returned results.
    pub async fn run_all(&self, chunks: &[Chunk]) -> Vec<JobResult> {
        if chunks.is_empty() {
            debug!("no chunks to dispatch");
            return Vec::new();
        }

        let workers = self.config.worker_count.max(1);
        info!(
            chunks = chunks.len(),
            workers,
            timeout_secs = self.config.job_timeout.as_secs(),
            "dispatching chunks"
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut handles = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let chunk = chunk.clone();
            let semaphore = Arc::clone(&semaphore);
            let log_lock = Arc::clone(&self.log_lock);
            let timeout = self.config.job_timeout;

            handles.push(tokio::spawn(async move {
                // Held until the process reaches a terminal state; this is
                // the concurrency bound.
                let _permit = semaphore.acquire_owned().await.ok();
                run_chunk(&chunk, timeout, &log_lock).await
            }));
        }

        let ordinals: Vec<usize> = chunks.iter().map(|chunk| chunk.ordinal).collect();
        let mut results = Vec::with_capacity(handles.len());

        for (ordinal, handle) in ordinals.into_iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                // A panicked worker still yields a terminal result.
                Err(join_err) => results.push(JobResult {
                    ordinal,
                    status: ChunkStatus::SpawnFailure,
                    stdout: Vec::new(),
                    stderr: format!("worker task failed: {join_err}").into_bytes(),
                    duration: Duration::ZERO,
                }),
            }
        }

        let failed = results.iter().filter(|result| !result.is_success()).count();
        info!(
            chunks = results.len(),
            failed, "all chunks reached a terminal state"
        );

        results
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::partition::Region;
    use std::time::Instant;
    use tempfile::TempDir;

    fn shell_chunk(ordinal: usize, script: &str, dir: &TempDir) -> Chunk {
        Chunk {
            ordinal,
            region: Region::new("chr1", 1, 100),
            command: vec!["sh".into(), "-c".into(), script.into()],
            tmp_dir: dir.path().join(format!("job_tmp_{ordinal}")),
            output_path: dir.path().join(format!("{ordinal}.mt2.vcf")),
        }
    }

    fn scheduler(workers: usize, timeout: Duration) -> JobScheduler {
        JobScheduler::new(SchedulerConfig {
            worker_count: workers,
            job_timeout: timeout,
        })
    }

    #[tokio::test]
    async fn test_zero_chunks_returns_immediately() {
        let results = scheduler(4, Duration::from_secs(5)).run_all(&[]).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_success_captures_stdout() {
        let dir = TempDir::new().unwrap();
        let chunks = vec![shell_chunk(0, "echo scatter-ok", &dir)];

        let results = scheduler(1, Duration::from_secs(10)).run_all(&chunks).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].is_success());
        assert!(String::from_utf8_lossy(&results[0].stdout).contains("scatter-ok"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_recorded_with_code_and_stderr() {
        let dir = TempDir::new().unwrap();
        let chunks = vec![shell_chunk(0, "echo boom >&2; exit 3", &dir)];

        let results = scheduler(1, Duration::from_secs(10)).run_all(&chunks).await;

        assert_eq!(results[0].status, ChunkStatus::NonZeroExit(3));
        assert!(String::from_utf8_lossy(&results[0].stderr).contains("boom"));
    }

    #[tokio::test]
    async fn test_unspawnable_command_is_spawn_failure() {
        let dir = TempDir::new().unwrap();
        let mut chunk = shell_chunk(0, "true", &dir);
        chunk.command = vec!["/no/such/binary/anywhere".into()];

        let results = scheduler(1, Duration::from_secs(10))
            .run_all(&[chunk])
            .await;

        assert_eq!(results[0].status, ChunkStatus::SpawnFailure);
        assert!(!results[0].stderr.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_kills_and_records_timeout() {
        let dir = TempDir::new().unwrap();
        let chunks = vec![shell_chunk(0, "sleep 30", &dir)];

        let start = Instant::now();
        let results = scheduler(1, Duration::from_millis(200))
            .run_all(&chunks)
            .await;

        assert_eq!(results[0].status, ChunkStatus::Timeout);
        assert!(
            start.elapsed() < Duration::from_secs(5),
            "timed-out chunk was not killed promptly"
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_cancel_siblings() {
        let dir = TempDir::new().unwrap();
        let chunks = vec![
            shell_chunk(0, "sleep 30", &dir),
            shell_chunk(1, "exit 2", &dir),
            shell_chunk(2, "echo fine", &dir),
        ];

        let results = scheduler(3, Duration::from_millis(300))
            .run_all(&chunks)
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].status, ChunkStatus::Timeout);
        assert_eq!(results[1].status, ChunkStatus::NonZeroExit(2));
        assert_eq!(results[2].status, ChunkStatus::Success);
    }

    #[tokio::test]
    async fn test_results_come_back_in_ordinal_order() {
        let dir = TempDir::new().unwrap();
        // Later ordinals finish first.
        let chunks = vec![
            shell_chunk(0, "sleep 0.4", &dir),
            shell_chunk(1, "sleep 0.2", &dir),
            shell_chunk(2, "true", &dir),
        ];

        let results = scheduler(3, Duration::from_secs(10)).run_all(&chunks).await;

        let ordinals: Vec<usize> = results.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_worker_count_bounds_concurrency() {
        let dir = TempDir::new().unwrap();
        let chunks: Vec<Chunk> = (0..4)
            .map(|i| shell_chunk(i, "sleep 0.5", &dir))
            .collect();

        // Two workers over four half-second jobs need at least two waves.
        let start = Instant::now();
        let results = scheduler(2, Duration::from_secs(10)).run_all(&chunks).await;
        let elapsed = start.elapsed();

        assert!(results.iter().all(|r| r.is_success()));
        assert!(
            elapsed >= Duration::from_millis(950),
            "four jobs finished in {elapsed:?}; more than two ran concurrently"
        );
    }

    #[tokio::test]
    async fn test_workers_overlap_wait_time() {
        let dir = TempDir::new().unwrap();
        let chunks: Vec<Chunk> = (0..4)
            .map(|i| shell_chunk(i, "sleep 0.5", &dir))
            .collect();

        // Four workers should finish far sooner than the 2s serial time.
        let start = Instant::now();
        let results = scheduler(4, Duration::from_secs(10)).run_all(&chunks).await;
        let elapsed = start.elapsed();

        assert!(results.iter().all(|r| r.is_success()));
        assert!(
            elapsed < Duration::from_millis(1800),
            "four workers took {elapsed:?} for four 0.5s jobs"
        );
    }
}
