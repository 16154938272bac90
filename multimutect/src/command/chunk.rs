//! Chunk construction: region + parameters → process invocation.

use super::Mutect2Params;
use crate::partition::Region;
use std::ffi::OsString;
use std::path::PathBuf;

/// Filename suffix of every per-chunk output VCF.
pub const OUTPUT_SUFFIX: &str = ".mt2.vcf";

/// One unit of partitioned work: a region plus its derived invocation.
///
/// The ordinal is the zero-based position in partition order. It is the sole
/// source of both the output filename (`{ordinal}.mt2.vcf`) and the merge
/// order, independent of filesystem listing order, and it is injective:
/// concurrently-running chunks can never collide on an output path.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Zero-based position in partition order.
    pub ordinal: usize,

    /// The genomic region this chunk evaluates.
    pub region: Region,

    /// Full process invocation; `command[0]` is the program, the rest are
    /// literal arguments. Never passed through a shell.
    pub command: Vec<OsString>,

    /// The chunk's private JVM temp directory (`job_tmp_{ordinal}`).
    pub tmp_dir: PathBuf,

    /// Where the invocation writes its VCF (`-o`).
    pub output_path: PathBuf,
}

/// Builds the MuTect2 invocation for one region.
///
/// Pure: the same `(ordinal, region, params)` always yields the same chunk.
/// The argv mirrors a GATK 3.6 MuTect2 call pinned to a single compute
/// thread per process (`-nct 1 -nt 1`); parallelism comes from running many
/// such processes, not from GATK's internal threading.
pub fn build_chunk(ordinal: usize, region: Region, params: &Mutect2Params) -> Chunk {
    let output_path = params.output_dir.join(format!("{ordinal}{OUTPUT_SUFFIX}"));
    let tmp_dir = params.tmp_dir.join(format!("job_tmp_{ordinal}"));

    let mut tmpdir_arg = OsString::from("-Djava.io.tmpdir=");
    tmpdir_arg.push(tmp_dir.as_os_str());

    let mut command: Vec<OsString> = vec![
        params.java.clone().into_os_string(),
        tmpdir_arg,
        "-d64".into(),
        "-jar".into(),
        format!("-Xmx{}", params.java_heap).into(),
        "-XX:+UseSerialGC".into(),
        params.gatk_jar.clone().into_os_string(),
        "-T".into(),
        "MuTect2".into(),
        "-nct".into(),
        "1".into(),
        "-nt".into(),
        "1".into(),
        "-R".into(),
        params.reference.clone().into_os_string(),
        "-L".into(),
        region.to_string().into(),
        "-I:tumor".into(),
        params.tumor_bam.clone().into_os_string(),
        "-I:normal".into(),
        params.normal_bam.clone().into_os_string(),
        "--normal_panel".into(),
        params.panel_of_normals.clone().into_os_string(),
        "--cosmic".into(),
        params.cosmic.clone().into_os_string(),
        "--dbsnp".into(),
        params.dbsnp.clone().into_os_string(),
        "--contamination_fraction_to_filter".into(),
        params.contamination.to_string().into(),
        "-o".into(),
        output_path.clone().into_os_string(),
        "--output_mode".into(),
        "EMIT_VARIANTS_ONLY".into(),
        "--disable_auto_index_creation_and_locking_when_reading_rods".into(),
    ];

    if params.dont_use_soft_clipped_bases {
        command.push("--dontUseSoftClippedBases".into());
    }

    Chunk {
        ordinal,
        region,
        command,
        tmp_dir,
        output_path,
    }
}

/// Builds chunks for every region, assigning ordinals in partition order.
pub fn build_chunks(
    regions: impl IntoIterator<Item = Region>,
    params: &Mutect2Params,
) -> Vec<Chunk> {
    regions
        .into_iter()
        .enumerate()
        .map(|(ordinal, region)| build_chunk(ordinal, region, params))
        .collect()
}

/// Renders an argv for logging, space-joined and lossily decoded.
pub fn render_argv(command: &[OsString]) -> String {
    command
        .iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
