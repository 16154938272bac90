//! BED interval parsing.
//!
//! BED rows are whitespace-separated `chrom start end` triples with 0-based
//! half-open coordinates; columns beyond the third are ignored. Conversion to
//! the 1-based inclusive [`Region`] convention is `(chrom, start + 1, end)`.
//! Input order is preserved and intervals are neither merged nor
//! deduplicated: one BED row becomes exactly one scatter chunk.

use super::{PartitionError, Region};
use std::fs;
use std::path::Path;

/// Reads scatter regions from a BED interval file.
///
/// Blank lines are skipped. A zero-length interval (`start == end`) is
/// rejected as malformed: it would convert to a region ending before it
/// starts, which GATK cannot evaluate.
///
/// # Errors
///
/// Returns [`PartitionError::Io`] if the file cannot be read and
/// [`PartitionError::MalformedInterval`] for rows with fewer than three
/// columns, non-numeric coordinates, or an empty converted range.
pub fn read_bed_regions(path: &Path) -> Result<Vec<Region>, PartitionError> {
    let contents = fs::read_to_string(path).map_err(|source| PartitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut regions = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(chrom), Some(start_field), Some(end_field)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(PartitionError::MalformedInterval {
                line: idx + 1,
                reason: "expected at least three columns (chrom, start, end)".to_string(),
            });
        };

        let start0 = parse_coordinate(start_field, idx + 1)?;
        let end = parse_coordinate(end_field, idx + 1)?;

        if end <= start0 {
            return Err(PartitionError::MalformedInterval {
                line: idx + 1,
                reason: format!("interval [{start0}, {end}) covers no bases"),
            });
        }

        regions.push(Region {
            sequence: chrom.to_string(),
            start: start0 + 1,
            end,
        });
    }

    Ok(regions)
}

fn parse_coordinate(field: &str, line: usize) -> Result<u64, PartitionError> {
    field
        .parse::<u64>()
        .map_err(|_| PartitionError::MalformedInterval {
            line,
            reason: format!("invalid coordinate '{field}'"),
        })
}
