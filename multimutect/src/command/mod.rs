//! MuTect2 invocation construction.
//!
//! This module turns one [`Region`](crate::partition::Region) plus a fixed,
//! validated parameter set into one fully-specified external-process
//! invocation and its expected output path. Commands are built as literal
//! argument vectors, never shell-interpreted strings, so a path containing
//! spaces or metacharacters can never change the command's meaning.
//!
//! Chunk output filenames are derived solely from the chunk ordinal
//! (`{ordinal}.mt2.vcf`), which makes them collision-free across concurrent
//! chunks and lets the merge stage recover order without consulting the
//! filesystem.

mod chunk;
mod params;

pub use chunk::{build_chunk, build_chunks, render_argv, Chunk, OUTPUT_SUFFIX};
pub use params::{CommandBuildError, Mutect2Params, Mutect2ParamsBuilder};
