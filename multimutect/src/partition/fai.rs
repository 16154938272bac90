//! Sequence index parsing and block partitioning.
//!
//! A faidx index (`.fai`) is a tab-separated table whose first two columns
//! are the sequence name and its length; the remaining columns (byte offset,
//! line widths) are irrelevant here and ignored. Index-derived regions cut
//! every sequence into successive blocks of at most `block_size` bases.

use super::{PartitionError, Region};
use std::fs;
use std::path::Path;

/// One `(name, length)` row of a sequence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceLength {
    /// Reference sequence name.
    pub name: String,

    /// Sequence length in bases.
    pub length: u64,
}

/// Reads `(name, length)` pairs from a faidx index file, in file order.
///
/// `max_sequences` caps how many index rows are read; callers scattering a
/// human reference typically limit this to the primary contigs and skip the
/// long tail of unplaced scaffolds. `None` reads the whole index.
///
/// # Errors
///
/// Returns [`PartitionError::Io`] if the file cannot be read and
/// [`PartitionError::MalformedIndex`] for rows with fewer than two columns
/// or a non-numeric length.
pub fn read_sequence_index(
    path: &Path,
    max_sequences: Option<usize>,
) -> Result<Vec<SequenceLength>, PartitionError> {
    let contents = fs::read_to_string(path).map_err(|source| PartitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let limit = max_sequences.unwrap_or(usize::MAX);
    let mut sequences = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        if sequences.len() >= limit {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let name = fields
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| PartitionError::MalformedIndex {
                line: idx + 1,
                reason: "missing sequence name".to_string(),
            })?;
        let length_field = fields.next().ok_or_else(|| PartitionError::MalformedIndex {
            line: idx + 1,
            reason: "missing sequence length column".to_string(),
        })?;
        let length = length_field
            .parse::<u64>()
            .map_err(|_| PartitionError::MalformedIndex {
                line: idx + 1,
                reason: format!("invalid sequence length '{length_field}'"),
            })?;

        sequences.push(SequenceLength {
            name: name.to_string(),
            length,
        });
    }

    Ok(sequences)
}

/// Cuts every sequence into successive blocks of at most `block_size` bases.
///
/// For a sequence of length `L`, emits `[i, min(i + block_size - 1, L)]` for
/// `i` stepping from 1 by `block_size`. The union of the emitted regions
/// covers `[1, L]` exactly, with no gaps or overlaps; only the final block of
/// a sequence may be shorter than `block_size`. Sequences are processed in
/// input order, and a zero-length sequence contributes no regions.
///
/// The returned iterator is lazy and can be recreated by calling this
/// function again over the same slice.
///
/// # Errors
///
/// Returns [`PartitionError::InvalidBlockSize`] if `block_size` is zero.
pub fn block_regions(
    sequences: &[SequenceLength],
    block_size: u64,
) -> Result<impl Iterator<Item = Region> + '_, PartitionError> {
    if block_size == 0 {
        return Err(PartitionError::InvalidBlockSize(block_size));
    }

    Ok(sequences.iter().flat_map(move |seq| {
        (1..=seq.length)
            .step_by(block_size as usize)
            .map(move |start| Region {
                sequence: seq.name.clone(),
                start,
                end: (start + block_size - 1).min(seq.length),
            })
    }))
}
