//! MultiMutect - Scatter/gather driver for parallel MuTect2 variant calling
//!
//! This library parallelizes a single long-running MuTect2 run by splitting
//! the reference coordinate space into independent regions, executing one
//! GATK process per region under a bounded worker pool, validating that every
//! dispatched chunk produced output, and merging the partial VCFs into one
//! deterministic combined artifact.
//!
//! # High-Level API
//!
//! For most use cases, the [`pipeline`] module provides the complete run:
//!
//! ```ignore
//! use multimutect::pipeline::{self, PipelineConfig, RegionSource};
//!
//! let config = PipelineConfig {
//!     params,                        // validated Mutect2Params
//!     scheduler: scheduler_config,   // worker count + per-job timeout
//!     source: RegionSource::Intervals { path: bed_path },
//!     merged_output: "multi_mutect2_merged.vcf".into(),
//! };
//!
//! let summary = pipeline::run(&config).await?;
//! ```
//!
//! The individual stages are also public: [`partition`] turns a sequence
//! index or interval file into regions, [`command`] turns regions into chunk
//! invocations, [`scheduler`] executes them concurrently, [`validate`] checks
//! the produced outputs, and [`merge`] concatenates them in chunk order.

pub mod command;
pub mod logging;
pub mod merge;
pub mod partition;
pub mod pipeline;
pub mod scheduler;
pub mod validate;

/// Version of the MultiMutect library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
