//! MultiMutect CLI - parallel MuTect2 scatter/gather driver
//!
//! This binary wires command-line arguments into the multimutect library:
//! it partitions the reference, runs one MuTect2 process per region under a
//! bounded worker pool, validates the per-chunk VCFs, and merges them into
//! one combined artifact.

mod error;

use clap::{ArgGroup, Parser};
use error::CliError;
use multimutect::command::Mutect2Params;
use multimutect::logging::init_logging;
use multimutect::pipeline::{self, PipelineConfig, RegionSource};
use multimutect::scheduler::{SchedulerConfig, DEFAULT_JOB_TIMEOUT_SECS};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Parser)]
#[command(name = "multimutect")]
#[command(about = "Parallel MuTect2 variant calling over scattered reference regions")]
#[command(version = multimutect::VERSION)]
#[command(group(ArgGroup::new("regions").required(true)))]
struct Args {
    /// Java heap memory, passed as -Xmx (e.g. 4G)
    #[arg(long)]
    java_heap: String,

    /// Reference FASTA path
    #[arg(long)]
    reference_path: PathBuf,

    /// Interval BED file; one scatter chunk per row
    #[arg(long, group = "regions")]
    interval_bed_path: Option<PathBuf>,

    /// Reference sequence index (.fai) to cut into fixed-size blocks
    #[arg(long, group = "regions", requires = "block_size")]
    fai_path: Option<PathBuf>,

    /// Block size in bases for index-derived regions
    #[arg(long)]
    block_size: Option<u64>,

    /// Use only the first N index rows (primary contigs)
    #[arg(long)]
    limit_contigs: Option<usize>,

    /// Tumor BAM file
    #[arg(long)]
    tumor_bam: PathBuf,

    /// Normal BAM file
    #[arg(long)]
    normal_bam: PathBuf,

    /// Number of concurrent MuTect2 processes
    #[arg(long)]
    thread_count: usize,

    /// Panel of normals VCF path
    #[arg(long)]
    pon: PathBuf,

    /// COSMIC known-variant VCF path
    #[arg(long)]
    cosmic: PathBuf,

    /// dbSNP known-variant VCF path
    #[arg(long)]
    dbsnp: PathBuf,

    /// Contamination estimation value from ContEst
    #[arg(long)]
    contest: f64,

    /// Do not analyze soft clipped bases in the reads
    #[arg(short = 'm', long)]
    dont_use_soft_clipped_bases: bool,

    /// GATK jar path
    #[arg(long, default_value = "/usr/local/bin/gatk.jar")]
    gatk_jar: PathBuf,

    /// Java binary used to launch GATK
    #[arg(long, default_value = "java")]
    java: PathBuf,

    /// Per-chunk timeout in seconds
    #[arg(long, default_value_t = DEFAULT_JOB_TIMEOUT_SECS)]
    job_timeout_secs: u64,

    /// Directory receiving per-chunk VCFs
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Path of the merged VCF
    #[arg(long, default_value = "multi_mutect2_merged.vcf")]
    merged_output: PathBuf,

    /// Base directory for per-chunk JVM temp dirs
    #[arg(long, default_value = "/tmp")]
    tmp_dir: PathBuf,

    /// Also write logs to <dir>/multimutect.log
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _guard = match init_logging(args.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    if let Err(e) = run(args).await {
        e.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let start = Instant::now();
    info!("multimutect {}", multimutect::VERSION);
    info!(
        "program args: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );

    let params = Mutect2Params::builder()
        .java(args.java)
        .gatk_jar(args.gatk_jar)
        .java_heap(args.java_heap)
        .reference(args.reference_path)
        .tumor_bam(args.tumor_bam)
        .normal_bam(args.normal_bam)
        .panel_of_normals(args.pon)
        .cosmic(args.cosmic)
        .dbsnp(args.dbsnp)
        .contamination(args.contest)
        .tmp_dir(args.tmp_dir)
        .output_dir(args.output_dir)
        .dont_use_soft_clipped_bases(args.dont_use_soft_clipped_bases)
        .build()?;

    let source = match (args.interval_bed_path, args.fai_path) {
        (Some(path), _) => RegionSource::Intervals { path },
        (None, Some(path)) => RegionSource::Index {
            path,
            block_size: args.block_size.unwrap_or(0),
            max_sequences: args.limit_contigs,
        },
        (None, None) => {
            return Err(CliError::Config(
                "either --interval-bed-path or --fai-path is required".to_string(),
            ))
        }
    };

    let config = PipelineConfig {
        params,
        scheduler: SchedulerConfig {
            worker_count: args.thread_count,
            job_timeout: Duration::from_secs(args.job_timeout_secs),
        },
        source,
        merged_output: args.merged_output,
    };

    let summary = pipeline::run(&config).await?;

    info!(
        "finished, took {:.2} seconds",
        start.elapsed().as_secs_f64()
    );

    if summary.all_succeeded() {
        Ok(())
    } else {
        Err(CliError::ChunksFailed {
            failed: summary.failures.len(),
            total: summary.chunk_count,
        })
    }
}
