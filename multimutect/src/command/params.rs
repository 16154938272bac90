//! The validated MuTect2 parameter set.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling the parameter set.
#[derive(Debug, Error)]
pub enum CommandBuildError {
    /// A required parameter was never supplied to the builder.
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),
}

/// All fixed inputs of one MuTect2 scatter run.
///
/// These are shared by every chunk; only the region, the per-chunk temp
/// directory, and the output filename vary per invocation. Construct via
/// [`Mutect2Params::builder`], which reports the first missing required
/// field as a [`CommandBuildError`].
#[derive(Debug, Clone)]
pub struct Mutect2Params {
    /// Java binary used to launch GATK.
    pub java: PathBuf,

    /// Path to the GenomeAnalysisTK jar.
    pub gatk_jar: PathBuf,

    /// JVM heap size, passed verbatim as `-Xmx` (e.g. `4G`).
    pub java_heap: String,

    /// Reference FASTA path.
    pub reference: PathBuf,

    /// Tumor alignment (BAM) path.
    pub tumor_bam: PathBuf,

    /// Normal alignment (BAM) path.
    pub normal_bam: PathBuf,

    /// Panel-of-normals VCF path.
    pub panel_of_normals: PathBuf,

    /// COSMIC known-variant VCF path.
    pub cosmic: PathBuf,

    /// dbSNP known-variant VCF path.
    pub dbsnp: PathBuf,

    /// Cross-sample contamination fraction to filter (ContEst estimate).
    pub contamination: f64,

    /// Base directory for per-chunk JVM temp dirs (`job_tmp_{ordinal}`).
    pub tmp_dir: PathBuf,

    /// Directory receiving per-chunk output VCFs.
    pub output_dir: PathBuf,

    /// Pass `--dontUseSoftClippedBases` to exclude soft-clipped bases.
    pub dont_use_soft_clipped_bases: bool,
}

impl Mutect2Params {
    /// Starts a builder with nothing set except defaults.
    pub fn builder() -> Mutect2ParamsBuilder {
        Mutect2ParamsBuilder::default()
    }
}

/// Builder for [`Mutect2Params`].
///
/// `java`, `tmp_dir`, and `output_dir` have defaults (`java`, `/tmp`, `.`);
/// every other field is required.
#[derive(Debug, Default)]
pub struct Mutect2ParamsBuilder {
    java: Option<PathBuf>,
    gatk_jar: Option<PathBuf>,
    java_heap: Option<String>,
    reference: Option<PathBuf>,
    tumor_bam: Option<PathBuf>,
    normal_bam: Option<PathBuf>,
    panel_of_normals: Option<PathBuf>,
    cosmic: Option<PathBuf>,
    dbsnp: Option<PathBuf>,
    contamination: Option<f64>,
    tmp_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    dont_use_soft_clipped_bases: bool,
}

impl Mutect2ParamsBuilder {
    pub fn java(mut self, path: impl Into<PathBuf>) -> Self {
        self.java = Some(path.into());
        self
    }

    pub fn gatk_jar(mut self, path: impl Into<PathBuf>) -> Self {
        self.gatk_jar = Some(path.into());
        self
    }

    pub fn java_heap(mut self, heap: impl Into<String>) -> Self {
        self.java_heap = Some(heap.into());
        self
    }

    pub fn reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference = Some(path.into());
        self
    }

    pub fn tumor_bam(mut self, path: impl Into<PathBuf>) -> Self {
        self.tumor_bam = Some(path.into());
        self
    }

    pub fn normal_bam(mut self, path: impl Into<PathBuf>) -> Self {
        self.normal_bam = Some(path.into());
        self
    }

    pub fn panel_of_normals(mut self, path: impl Into<PathBuf>) -> Self {
        self.panel_of_normals = Some(path.into());
        self
    }

    pub fn cosmic(mut self, path: impl Into<PathBuf>) -> Self {
        self.cosmic = Some(path.into());
        self
    }

    pub fn dbsnp(mut self, path: impl Into<PathBuf>) -> Self {
        self.dbsnp = Some(path.into());
        self
    }

    pub fn contamination(mut self, fraction: f64) -> Self {
        self.contamination = Some(fraction);
        self
    }

    pub fn tmp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.tmp_dir = Some(path.into());
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn dont_use_soft_clipped_bases(mut self, exclude: bool) -> Self {
        self.dont_use_soft_clipped_bases = exclude;
        self
    }

    /// Validates presence of every required parameter.
    ///
    /// # Errors
    ///
    /// Returns [`CommandBuildError::MissingParameter`] naming the first
    /// required field that was never set.
    pub fn build(self) -> Result<Mutect2Params, CommandBuildError> {
        Ok(Mutect2Params {
            java: self.java.unwrap_or_else(|| PathBuf::from("java")),
            gatk_jar: self
                .gatk_jar
                .ok_or(CommandBuildError::MissingParameter("gatk_jar"))?,
            java_heap: self
                .java_heap
                .ok_or(CommandBuildError::MissingParameter("java_heap"))?,
            reference: self
                .reference
                .ok_or(CommandBuildError::MissingParameter("reference"))?,
            tumor_bam: self
                .tumor_bam
                .ok_or(CommandBuildError::MissingParameter("tumor_bam"))?,
            normal_bam: self
                .normal_bam
                .ok_or(CommandBuildError::MissingParameter("normal_bam"))?,
            panel_of_normals: self
                .panel_of_normals
                .ok_or(CommandBuildError::MissingParameter("panel_of_normals"))?,
            cosmic: self
                .cosmic
                .ok_or(CommandBuildError::MissingParameter("cosmic"))?,
            dbsnp: self
                .dbsnp
                .ok_or(CommandBuildError::MissingParameter("dbsnp"))?,
            contamination: self
                .contamination
                .ok_or(CommandBuildError::MissingParameter("contamination"))?,
            tmp_dir: self.tmp_dir.unwrap_or_else(|| PathBuf::from("/tmp")),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            dont_use_soft_clipped_bases: self.dont_use_soft_clipped_bases,
        })
    }
}
