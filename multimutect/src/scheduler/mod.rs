//! Bounded concurrent execution of chunk processes.
//!
//! The scheduler runs every chunk's external invocation under a worker pool
//! capped at a configured concurrency, with per-job timeouts and per-chunk
//! failure isolation:
//!
//! - At most `worker_count` processes are live at any instant, enforced by a
//!   semaphore permit held for the lifetime of each process. The workload is
//!   process-wait-bound, so workers overlap wait time rather than compete
//!   for CPU.
//! - A chunk that exceeds its timeout has its whole process group killed; a
//!   chunk that exits nonzero or fails to spawn is recorded as such. No
//!   failure cancels a sibling chunk.
//! - Every chunk ends in exactly one terminal [`JobResult`]; `run_all`
//!   returns only once all of them exist.
//!
//! Admission and completion order are unspecified. Merge order and output
//! filenames are recovered downstream from the immutable chunk ordinal,
//! never from completion order.

mod config;
mod pool;
mod process;
mod result;

pub use config::{SchedulerConfig, DEFAULT_JOB_TIMEOUT_SECS, FALLBACK_WORKER_COUNT};
pub use pool::JobScheduler;
pub use result::{ChunkStatus, JobResult};
