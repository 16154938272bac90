//! Single-chunk process execution.
//!
//! Each chunk's invocation runs in its own process group with a parent-death
//! signal installed, so a timeout (or the driver itself dying) can never
//! leave orphaned JVM descendants behind. Stdout and stderr are drained
//! concurrently with the wait to avoid pipe-buffer deadlock on chatty tools.

use super::result::{ChunkStatus, JobResult};
use crate::command::{render_argv, Chunk};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Runs one chunk to a terminal [`JobResult`].
///
/// Never returns an error: every failure mode (unspawnable command, nonzero
/// exit, deadline expiry) is converted to a result value here, at the worker
/// boundary, so one chunk's failure can never propagate into a sibling's
/// execution.
pub(crate) async fn run_chunk(chunk: &Chunk, timeout: Duration, log_lock: &Mutex<()>) -> JobResult {
    let start = Instant::now();

    if let Err(e) = tokio::fs::create_dir_all(&chunk.tmp_dir).await {
        let message = format!(
            "failed to create temp dir '{}': {e}",
            chunk.tmp_dir.display()
        );
        return finish(
            chunk,
            ChunkStatus::SpawnFailure,
            Vec::new(),
            message.into_bytes(),
            start,
            log_lock,
        )
        .await;
    }

    let Some((program, args)) = chunk.command.split_first() else {
        return finish(
            chunk,
            ChunkStatus::SpawnFailure,
            Vec::new(),
            b"empty command".to_vec(),
            start,
            log_lock,
        )
        .await;
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    isolate_process_group(&mut command);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            let message = format!("failed to spawn '{}': {e}", program.to_string_lossy());
            return finish(
                chunk,
                ChunkStatus::SpawnFailure,
                Vec::new(),
                message.into_bytes(),
                start,
                log_lock,
            )
            .await;
        }
    };

    let pid = child.id();
    let stdout_task = drain(child.stdout.take());
    let stderr_task = drain(child.stderr.take());

    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(exit)) => match exit.code() {
            Some(0) => ChunkStatus::Success,
            Some(code) => ChunkStatus::NonZeroExit(code),
            // Terminated by a signal we did not send.
            None => ChunkStatus::NonZeroExit(-1),
        },
        Ok(Err(e)) => {
            warn!(ordinal = chunk.ordinal, "wait on child failed: {e}");
            ChunkStatus::SpawnFailure
        }
        Err(_) => {
            kill_process_group(pid);
            let _ = child.kill().await;
            ChunkStatus::Timeout
        }
    };

    let stdout = stdout_task.await;
    let stderr = stderr_task.await;

    finish(chunk, status, stdout, stderr, start, log_lock).await
}

/// Reads a pipe to EOF on its own task; resolves to the captured bytes.
fn drain<R>(pipe: Option<R>) -> impl std::future::Future<Output = Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    let handle = pipe.map(|mut pipe| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf).await;
            buf
        })
    });

    async move {
        match handle {
            Some(handle) => handle.await.unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

/// Records the terminal result and logs it under the scheduler's log lock.
///
/// The lock serializes the multi-line failure dumps from concurrent workers;
/// without it, interleaved stderr from two failing chunks is unreadable.
async fn finish(
    chunk: &Chunk,
    status: ChunkStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    start: Instant,
    log_lock: &Mutex<()>,
) -> JobResult {
    let result = JobResult {
        ordinal: chunk.ordinal,
        status,
        stdout,
        stderr,
        duration: start.elapsed(),
    };

    let _guard = log_lock.lock().await;
    if result.is_success() {
        info!(
            ordinal = chunk.ordinal,
            region = %chunk.region,
            duration_secs = result.duration.as_secs_f64(),
            "chunk completed"
        );
    } else {
        error!(
            ordinal = chunk.ordinal,
            region = %chunk.region,
            status = ?result.status,
            duration_secs = result.duration.as_secs_f64(),
            "chunk failed"
        );
        error!("command: {}", render_argv(&chunk.command));
        if !result.stdout.is_empty() {
            error!(
                "chunk {} stdout:\n{}",
                chunk.ordinal,
                String::from_utf8_lossy(&result.stdout)
            );
        }
        if !result.stderr.is_empty() {
            error!(
                "chunk {} stderr:\n{}",
                chunk.ordinal,
                String::from_utf8_lossy(&result.stderr)
            );
        }
    }

    result
}

/// Places the child in its own process group and, on Linux, arranges for the
/// kernel to SIGKILL it if this driver dies first.
#[cfg(unix)]
fn isolate_process_group(command: &mut Command) {
    unsafe {
        command.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(std::io::Error::last_os_error());
            }
            #[cfg(target_os = "linux")]
            if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGKILL as libc::c_ulong) == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

#[cfg(not(unix))]
fn isolate_process_group(_command: &mut Command) {}

/// Kills the chunk's entire process group, not just the direct child, so a
/// JVM's forked descendants die with it.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    if let Some(pid) = pid {
        unsafe {
            libc::killpg(pid as libc::pid_t, libc::SIGKILL);
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}
