//! Reference coordinate partitioning.
//!
//! This module turns a reference sequence index (`.fai`) or a BED interval
//! file into an ordered sequence of non-overlapping [`Region`]s, one per
//! scatter chunk:
//!
//! - **Index mode** ([`fai`]): every sequence is cut into successive blocks
//!   of at most `block_size` bases, covering `[1, length]` exactly.
//! - **Interval mode** ([`bed`]): each BED row is converted from 0-based
//!   half-open to 1-based inclusive coordinates, preserving input order.
//!
//! Regions are 1-based inclusive on both ends, the convention GATK's `-L`
//! argument expects.

mod bed;
mod fai;
mod region;

pub use bed::read_bed_regions;
pub use fai::{block_regions, read_sequence_index, SequenceLength};
pub use region::Region;

use std::io;
use thiserror::Error;

/// Errors raised while partitioning the reference into regions.
#[derive(Debug, Error)]
pub enum PartitionError {
    /// Block size must be at least one base.
    #[error("block size must be positive, got {0}")]
    InvalidBlockSize(u64),

    /// Failed to read the index or interval file.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: io::Error,
    },

    /// A sequence index row that could not be parsed.
    #[error("malformed index line {line}: {reason}")]
    MalformedIndex { line: usize, reason: String },

    /// A BED interval row that could not be parsed.
    #[error("malformed interval line {line}: {reason}")]
    MalformedInterval { line: usize, reason: String },
}
