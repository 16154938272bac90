//! Integration tests for the complete scatter/gather workflow.
//!
//! These tests drive the real pipeline (partition, bounded dispatch,
//! validation, merge) against a stub executable that stands in for the
//! GATK jvm invocation. The stub scans its argv for `-L` (region) and `-o`
//! (output path) exactly as MuTect2 would receive them and writes a small
//! VCF whose data line names the region, which makes merge order visible in
//! the combined artifact.

#![cfg(unix)]

use multimutect::command::Mutect2Params;
use multimutect::partition::PartitionError;
use multimutect::pipeline::{self, PipelineConfig, PipelineError, RegionSource};
use multimutect::scheduler::{ChunkStatus, SchedulerConfig};
use multimutect::validate::ValidationError;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// A stub that writes a header block plus one data line naming the region.
const CALLER_STUB: &str = r##"#!/bin/sh
out=""
region=""
prev=""
for arg in "$@"; do
    case "$prev" in
        -o) out="$arg" ;;
        -L) region="$arg" ;;
    esac
    prev="$arg"
done
printf '##fileformat=VCFv4.1\n' > "$out"
printf '#CHROM\tPOS\tID\tREF\tALT\n' >> "$out"
printf '%s\n' "$region" >> "$out"
"##;

fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn write_bed(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("intervals.bed");
    fs::write(&path, contents).unwrap();
    path
}

fn params(dir: &TempDir, java: PathBuf) -> Mutect2Params {
    Mutect2Params::builder()
        .java(java)
        .gatk_jar("/opt/GenomeAnalysisTK.jar")
        .java_heap("1G")
        .reference("/ref/GRCh38.fa")
        .tumor_bam("/data/tumor.bam")
        .normal_bam("/data/normal.bam")
        .panel_of_normals("/ref/pon.vcf")
        .cosmic("/ref/cosmic.vcf")
        .dbsnp("/ref/dbsnp.vcf")
        .contamination(0.01)
        .tmp_dir(dir.path().join("tmp"))
        .output_dir(dir.path().join("out"))
        .build()
        .unwrap()
}

fn config(dir: &TempDir, java: PathBuf, source: RegionSource) -> PipelineConfig {
    PipelineConfig {
        params: params(dir, java),
        scheduler: SchedulerConfig {
            worker_count: 2,
            job_timeout: Duration::from_secs(30),
        },
        source,
        merged_output: dir.path().join("multi_mutect2_merged.vcf"),
    }
}

#[tokio::test]
async fn test_end_to_end_bed_scatter_merges_in_region_order() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "fake_caller.sh", CALLER_STUB);
    let bed = write_bed(dir.path(), "chr1\t0\t300\nchr1\t300\t600\nchr2\t100\t200\n");

    let summary = pipeline::run(&config(&dir, stub, RegionSource::Intervals { path: bed }))
        .await
        .unwrap();

    assert_eq!(summary.chunk_count, 3);
    assert!(summary.all_succeeded());

    // Every chunk left its own artifact.
    for ordinal in 0..3 {
        assert!(dir.path().join("out").join(format!("{ordinal}.mt2.vcf")).exists());
    }

    // One header block, data lines in ordinal (partition) order.
    let merged = fs::read_to_string(&summary.merged_output).unwrap();
    assert_eq!(
        merged,
        "##fileformat=VCFv4.1\n#CHROM\tPOS\tID\tREF\tALT\n\
         chr1:1-300\nchr1:301-600\nchr2:101-200\n"
    );
}

#[tokio::test]
async fn test_end_to_end_index_scatter_covers_whole_sequences() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "fake_caller.sh", CALLER_STUB);
    let fai = dir.path().join("ref.fa.fai");
    fs::write(&fai, "chr1\t1000\t0\t70\t71\nchr2\t250\t0\t70\t71\n").unwrap();

    let summary = pipeline::run(&config(
        &dir,
        stub,
        RegionSource::Index {
            path: fai,
            block_size: 300,
            max_sequences: None,
        },
    ))
    .await
    .unwrap();

    assert_eq!(summary.chunk_count, 5);
    let merged = fs::read_to_string(&summary.merged_output).unwrap();
    let data_lines: Vec<&str> = merged.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(
        data_lines,
        vec![
            "chr1:1-300",
            "chr1:301-600",
            "chr1:601-900",
            "chr1:901-1000",
            "chr2:1-250",
        ]
    );
}

#[tokio::test]
async fn test_failing_chunks_still_validate_and_merge() {
    let dir = TempDir::new().unwrap();
    // Writes its output, then fails: the run verdict must be failure, but
    // the partial outputs must still be validated and merged.
    let stub = write_stub(
        dir.path(),
        "failing_caller.sh",
        &format!("{CALLER_STUB}exit 3\n"),
    );
    let bed = write_bed(dir.path(), "chr1\t0\t100\nchr1\t100\t200\n");

    let summary = pipeline::run(&config(&dir, stub, RegionSource::Intervals { path: bed }))
        .await
        .unwrap();

    assert_eq!(summary.failures.len(), 2);
    assert!(summary
        .failures
        .iter()
        .all(|f| f.status == ChunkStatus::NonZeroExit(3)));

    let merged = fs::read_to_string(&summary.merged_output).unwrap();
    assert!(merged.contains("chr1:1-100"));
    assert!(merged.contains("chr1:101-200"));
}

#[tokio::test]
async fn test_empty_chunk_output_is_skipped_in_merge() {
    let dir = TempDir::new().unwrap();
    let stub_body = r##"#!/bin/sh
out=""
region=""
prev=""
for arg in "$@"; do
    case "$prev" in
        -o) out="$arg" ;;
        -L) region="$arg" ;;
    esac
    prev="$arg"
done
if [ "$region" = "chr1:101-200" ]; then
    : > "$out"
else
    printf '##fileformat=VCFv4.1\n' > "$out"
    printf '%s\n' "$region" >> "$out"
fi
"##;
    let stub = write_stub(dir.path(), "sometimes_empty.sh", stub_body);
    let bed = write_bed(dir.path(), "chr1\t0\t100\nchr1\t100\t200\nchr1\t200\t300\n");

    let summary = pipeline::run(&config(&dir, stub, RegionSource::Intervals { path: bed }))
        .await
        .unwrap();

    // An empty output is a warning, not a failure.
    assert!(summary.all_succeeded());

    let merged = fs::read_to_string(&summary.merged_output).unwrap();
    assert_eq!(merged, "##fileformat=VCFv4.1\nchr1:1-100\nchr1:201-300\n");
}

#[tokio::test]
async fn test_chunk_that_never_writes_fails_validation_without_merge() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "no_output.sh", "#!/bin/sh\nexit 0\n");
    let bed = write_bed(dir.path(), "chr1\t0\t100\n");
    let config = config(&dir, stub, RegionSource::Intervals { path: bed });

    let err = pipeline::run(&config).await.err().unwrap();

    assert!(matches!(
        err,
        PipelineError::Validation(ValidationError::MissingOutput {
            expected: 1,
            found: 0
        })
    ));
    assert!(!config.merged_output.exists());
}

#[tokio::test]
async fn test_timed_out_chunk_surfaces_as_missing_output() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "hung_caller.sh", "#!/bin/sh\nsleep 30\n");
    let bed = write_bed(dir.path(), "chr1\t0\t100\n");

    let mut config = config(&dir, stub, RegionSource::Intervals { path: bed });
    config.scheduler.job_timeout = Duration::from_millis(200);

    let err = pipeline::run(&config).await.err().unwrap();
    assert!(matches!(err, PipelineError::Validation(_)));
}

#[tokio::test]
async fn test_malformed_bed_aborts_before_any_dispatch() {
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "fake_caller.sh", CALLER_STUB);
    let bed = write_bed(dir.path(), "chr1\tnot-a-number\t100\n");
    let config = config(&dir, stub, RegionSource::Intervals { path: bed });

    let err = pipeline::run(&config).await.err().unwrap();

    assert!(matches!(
        err,
        PipelineError::Partition(PartitionError::MalformedInterval { line: 1, .. })
    ));
    // The output directory was never created.
    assert!(!config.params.output_dir.exists());
}
