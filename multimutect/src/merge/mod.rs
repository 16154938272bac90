//! Ordered merge of chunk outputs.
//!
//! Chunk outputs are concatenated strictly in ascending ordinal order,
//! never directory listing order (which is unordered), so re-running the
//! merge over the same outputs is byte-identical. The first non-empty output
//! contributes every line including its `#` header block; every later
//! non-empty output contributes only non-header lines, yielding exactly one
//! header block in the merged artifact.

use crate::validate::ChunkOutput;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// VCF header/comment marker; header lines start with `#`.
const HEADER_MARKER: u8 = b'#';

/// Errors raised while producing the merged artifact.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Failed to read one chunk's output.
    #[error("failed to read chunk output '{}': {source}", path.display())]
    ReadChunk {
        path: PathBuf,
        source: io::Error,
    },

    /// Failed to create or write the merged artifact.
    #[error("failed to write merged output '{}': {source}", path.display())]
    WriteMerged {
        path: PathBuf,
        source: io::Error,
    },
}

/// Merges validated chunk outputs into one artifact at `dest`.
///
/// Outputs marked empty are skipped with a warning. If every chunk is empty
/// (or there are no chunks at all), the merged artifact is created with zero
/// lines: a trivially successful run, not an error. Lines are copied as raw
/// bytes, so a final line without a trailing newline survives verbatim.
pub fn merge_outputs(outputs: &[ChunkOutput], dest: &Path) -> Result<(), MergeError> {
    let mut ordered: Vec<&ChunkOutput> = outputs.iter().collect();
    ordered.sort_by_key(|output| output.ordinal);

    let file = File::create(dest).map_err(|source| MergeError::WriteMerged {
        path: dest.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let mut header_written = false;
    let mut merged = 0usize;

    for output in ordered {
        if output.empty {
            warn!(
                ordinal = output.ordinal,
                path = %output.path.display(),
                "skipping empty chunk output"
            );
            continue;
        }

        append_output(output, &mut writer, header_written, dest)?;
        header_written = true;
        merged += 1;
    }

    writer.flush().map_err(|source| MergeError::WriteMerged {
        path: dest.to_path_buf(),
        source,
    })?;

    info!(
        merged,
        skipped = outputs.len() - merged,
        dest = %dest.display(),
        "merge complete"
    );
    Ok(())
}

/// Copies one chunk output into the merged artifact.
///
/// With `skip_headers` set, lines starting with `#` are dropped; the header
/// block only ever comes from the first non-empty chunk.
fn append_output(
    output: &ChunkOutput,
    writer: &mut BufWriter<File>,
    skip_headers: bool,
    dest: &Path,
) -> Result<(), MergeError> {
    let file = File::open(&output.path).map_err(|source| MergeError::ReadChunk {
        path: output.path.clone(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|source| MergeError::ReadChunk {
                path: output.path.clone(),
                source,
            })?;
        if read == 0 {
            break;
        }
        if skip_headers && line.first() == Some(&HEADER_MARKER) {
            continue;
        }
        writer
            .write_all(&line)
            .map_err(|source| MergeError::WriteMerged {
                path: dest.to_path_buf(),
                source,
            })?;
    }

    Ok(())
}
