//! Post-scheduling output validation.
//!
//! After every chunk has reached a terminal state, the validator confirms
//! that the output directory holds exactly one artifact per dispatched
//! chunk. A count mismatch means a job crashed or went unaccounted for and
//! is fatal: merging a partial scatter would silently drop variants. A
//! zero-size output, by contrast, is merely suspicious: the chunk is marked
//! empty, logged, and excluded from the merge, but the run continues.

use crate::command::Chunk;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::warn;

/// Matches per-chunk output filenames (`{ordinal}.mt2.vcf`).
static OUTPUT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.mt2\.vcf$").expect("output filename pattern is valid"));

/// Errors raised while validating chunk outputs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The output directory holds a different number of chunk outputs than
    /// were dispatched.
    #[error("missing output: expected {expected} chunk outputs, found {found}")]
    MissingOutput { expected: usize, found: usize },

    /// The overall count matched but a specific chunk's output is absent
    /// (a stray file from another run is standing in for it).
    #[error("missing output for chunk {ordinal}: '{}'", path.display())]
    MissingChunk { ordinal: usize, path: PathBuf },

    /// Failed to list or stat outputs.
    #[error("failed to inspect '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
}

/// One chunk's validated output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutput {
    /// Ordinal of the producing chunk; the merge key.
    pub ordinal: usize,

    /// Path of the artifact.
    pub path: PathBuf,

    /// True when the artifact exists but holds zero bytes; excluded from
    /// the merge.
    pub empty: bool,
}

/// Confirms every dispatched chunk produced an output artifact.
///
/// Counts files in `output_dir` matching the `{ordinal}.mt2.vcf` pattern
/// against the number of dispatched chunks, then stats each chunk's expected
/// path. Zero-size outputs are marked [`empty`](ChunkOutput::empty) with a
/// warning; they do not fail validation.
///
/// Returns outputs in chunk order.
///
/// # Errors
///
/// [`ValidationError::MissingOutput`] on a count mismatch,
/// [`ValidationError::MissingChunk`] when an expected path is absent despite
/// a matching count, [`ValidationError::Io`] on filesystem failures.
pub fn validate_outputs(
    chunks: &[Chunk],
    output_dir: &Path,
) -> Result<Vec<ChunkOutput>, ValidationError> {
    let entries = fs::read_dir(output_dir).map_err(|source| ValidationError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut found = 0usize;
    for entry in entries {
        let entry = entry.map_err(|source| ValidationError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        if OUTPUT_NAME.is_match(&entry.file_name().to_string_lossy()) {
            found += 1;
        }
    }

    if found != chunks.len() {
        return Err(ValidationError::MissingOutput {
            expected: chunks.len(),
            found,
        });
    }

    let mut outputs = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let metadata = fs::metadata(&chunk.output_path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ValidationError::MissingChunk {
                    ordinal: chunk.ordinal,
                    path: chunk.output_path.clone(),
                }
            } else {
                ValidationError::Io {
                    path: chunk.output_path.clone(),
                    source,
                }
            }
        })?;

        let empty = metadata.len() == 0;
        if empty {
            warn!(
                ordinal = chunk.ordinal,
                region = %chunk.region,
                path = %chunk.output_path.display(),
                "empty chunk output, excluding from merge"
            );
        }

        outputs.push(ChunkOutput {
            ordinal: chunk.ordinal,
            path: chunk.output_path.clone(),
            empty,
        });
    }

    Ok(outputs)
}
