//! Terminal per-chunk results.

use std::time::Duration;

/// How a chunk's external process terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkStatus {
    /// The process exited zero.
    Success,

    /// The process exited with the given nonzero code; `-1` when it was
    /// terminated by a signal and reported no exit code.
    NonZeroExit(i32),

    /// The scheduler's deadline expired and the process group was killed.
    Timeout,

    /// The process could not be started (or its temp dir could not be
    /// created); details are captured in the result's stderr bytes.
    SpawnFailure,
}

impl ChunkStatus {
    /// True only for a clean zero exit.
    pub fn is_success(&self) -> bool {
        matches!(self, ChunkStatus::Success)
    }
}

/// The terminal record of one dispatched chunk.
///
/// Created exclusively by the scheduler when the chunk's process terminates
/// or is forcibly killed; immutable once recorded.
#[derive(Debug, Clone)]
pub struct JobResult {
    /// Ordinal of the chunk this result belongs to.
    pub ordinal: usize,

    /// Terminal status.
    pub status: ChunkStatus,

    /// Captured stdout of the process.
    pub stdout: Vec<u8>,

    /// Captured stderr of the process; spawn-failure details for chunks
    /// that never started.
    pub stderr: Vec<u8>,

    /// Wall-clock time from dispatch to terminal state.
    pub duration: Duration,
}

impl JobResult {
    /// True only for a clean zero exit.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// A short, single-line stderr excerpt for failure summaries.
    ///
    /// Takes the last non-blank line, truncated to at most `max_len` bytes
    /// on a character boundary.
    pub fn stderr_excerpt(&self, max_len: usize) -> String {
        let text = String::from_utf8_lossy(&self.stderr);
        let line = text.lines().rev().find(|l| !l.trim().is_empty());
        let mut excerpt = line.unwrap_or("").to_string();
        if excerpt.len() > max_len {
            let mut cut = max_len;
            while !excerpt.is_char_boundary(cut) {
                cut -= 1;
            }
            excerpt.truncate(cut);
            excerpt.push_str("...");
        }
        excerpt
    }
}
