//! End-to-end scatter/gather orchestration.
//!
//! Ties the stages together: partition the reference, derive one chunk per
//! region, execute all chunks under the bounded pool, validate the produced
//! outputs, and merge them in ordinal order.
//!
//! Fatal conditions (unreadable inputs, bad block size, missing outputs,
//! merge I/O failures) return a [`PipelineError`]. Per-chunk failures do
//! not: validation and merge still run so operators can inspect whatever
//! partial output exists, and the failures are reported in the returned
//! [`RunSummary`] for the caller to turn into an exit status.

use crate::command::{build_chunks, Mutect2Params};
use crate::merge::{merge_outputs, MergeError};
use crate::partition::{
    block_regions, read_bed_regions, read_sequence_index, PartitionError, Region,
};
use crate::scheduler::{ChunkStatus, JobScheduler, SchedulerConfig};
use crate::validate::{validate_outputs, ValidationError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

/// Where scatter regions come from.
#[derive(Debug, Clone)]
pub enum RegionSource {
    /// A faidx sequence index cut into fixed-size blocks.
    Index {
        path: PathBuf,
        block_size: u64,
        /// Optional cap on how many index rows are used (primary contigs).
        max_sequences: Option<usize>,
    },

    /// A BED interval file, one chunk per row.
    Intervals { path: PathBuf },
}

/// Everything one scatter/gather run needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fixed MuTect2 inputs shared by every chunk.
    pub params: Mutect2Params,

    /// Worker count and per-job timeout.
    pub scheduler: SchedulerConfig,

    /// Region source (index or intervals).
    pub source: RegionSource,

    /// Path of the merged artifact.
    pub merged_output: PathBuf,
}

/// One failed chunk, as reported in the [`RunSummary`].
#[derive(Debug, Clone)]
pub struct ChunkFailure {
    pub ordinal: usize,
    pub region: Region,
    pub status: ChunkStatus,
    pub stderr_excerpt: String,
}

/// Outcome of a completed run.
///
/// A run that reaches the summary has partitioned, scheduled, validated,
/// and merged; `failures` records chunks whose process did not exit zero.
#[derive(Debug)]
pub struct RunSummary {
    /// Number of chunks dispatched.
    pub chunk_count: usize,

    /// Chunks that did not succeed, in ordinal order.
    pub failures: Vec<ChunkFailure>,

    /// Path of the merged artifact.
    pub merged_output: PathBuf,
}

impl RunSummary {
    /// True when every dispatched chunk exited zero.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fatal pipeline errors; per-chunk failures are not among them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error("failed to create output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Runs the complete scatter/gather pipeline.
///
/// Zero regions is a trivially successful run: no processes are spawned and
/// the merged artifact is created empty.
pub async fn run(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    let regions = resolve_regions(&config.source)?;
    let chunks = build_chunks(regions, &config.params);
    info!(chunks = chunks.len(), "partitioned reference into chunks");

    std::fs::create_dir_all(&config.params.output_dir).map_err(|source| {
        PipelineError::OutputDir {
            path: config.params.output_dir.clone(),
            source,
        }
    })?;

    let scheduler = JobScheduler::new(config.scheduler.clone());
    let results = scheduler.run_all(&chunks).await;

    let mut failures = Vec::new();
    for result in &results {
        if result.is_success() {
            continue;
        }
        let region = chunks[result.ordinal].region.clone();
        let excerpt = result.stderr_excerpt(200);
        error!(
            ordinal = result.ordinal,
            region = %region,
            status = ?result.status,
            stderr = %excerpt,
            "chunk did not succeed"
        );
        failures.push(ChunkFailure {
            ordinal: result.ordinal,
            region,
            status: result.status.clone(),
            stderr_excerpt: excerpt,
        });
    }

    let outputs = validate_outputs(&chunks, &config.params.output_dir)?;
    merge_outputs(&outputs, &config.merged_output)?;

    info!(
        chunks = chunks.len(),
        failed = failures.len(),
        merged = %config.merged_output.display(),
        "run complete"
    );

    Ok(RunSummary {
        chunk_count: chunks.len(),
        failures,
        merged_output: config.merged_output.clone(),
    })
}

fn resolve_regions(source: &RegionSource) -> Result<Vec<Region>, PartitionError> {
    match source {
        RegionSource::Index {
            path,
            block_size,
            max_sequences,
        } => {
            let sequences = read_sequence_index(path, *max_sequences)?;
            let regions = block_regions(&sequences, *block_size)?.collect();
            Ok(regions)
        }
        RegionSource::Intervals { path } => read_bed_regions(path),
    }
}
