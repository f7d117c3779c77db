use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::corpus::WordLabel;

/// Sample encoding of the written WAV clips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitDepth {
    #[default]
    #[serde(rename = "PCM_16")]
    Pcm16,
    #[serde(rename = "PCM_24")]
    Pcm24,
    #[serde(rename = "PCM_32")]
    Pcm32,
    #[serde(rename = "PCM_U8")]
    PcmU8,
    #[serde(rename = "FLOAT")]
    Float,
    #[serde(rename = "DOUBLE")]
    Double,
}

impl BitDepth {
    /// Every accepted encoding name, in CLI order.
    pub const NAMES: &'static [&'static str] =
        &["PCM_16", "PCM_24", "PCM_32", "PCM_U8", "FLOAT", "DOUBLE"];

    pub fn name(self) -> &'static str {
        match self {
            BitDepth::Pcm16 => "PCM_16",
            BitDepth::Pcm24 => "PCM_24",
            BitDepth::Pcm32 => "PCM_32",
            BitDepth::PcmU8 => "PCM_U8",
            BitDepth::Float => "FLOAT",
            BitDepth::Double => "DOUBLE",
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        match self {
            BitDepth::PcmU8 => 8,
            BitDepth::Pcm16 => 16,
            BitDepth::Pcm24 => 24,
            BitDepth::Pcm32 | BitDepth::Float => 32,
            BitDepth::Double => 64,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, BitDepth::Float | BitDepth::Double)
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BitDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PCM_16" => Ok(BitDepth::Pcm16),
            "PCM_24" => Ok(BitDepth::Pcm24),
            "PCM_32" => Ok(BitDepth::Pcm32),
            "PCM_U8" => Ok(BitDepth::PcmU8),
            "FLOAT" => Ok(BitDepth::Float),
            "DOUBLE" => Ok(BitDepth::Double),
            other => Err(format!(
                "unknown bit depth '{}' (expected one of {})",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Everything besides the source paths that shapes one mixed clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixParams {
    /// Multiplier applied to the word signal
    pub word_vol: f64,
    /// Multiplier applied to the noise signal
    pub noise_vol: f64,
    /// Clip duration in seconds
    pub sample_time: f64,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    pub bit_depth: BitDepth,
}

impl MixParams {
    /// Number of samples in every output clip.
    pub fn clip_len(&self) -> usize {
        (self.sample_time * self.sample_rate as f64).round() as usize
    }
}

impl Default for MixParams {
    fn default() -> Self {
        Self {
            word_vol: 1.0,
            noise_vol: 0.1,
            sample_time: 1.0,
            sample_rate: 16000,
            bit_depth: BitDepth::Pcm16,
        }
    }
}

/// Role an output category plays in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Background,
    Target,
    Unknown,
}

/// Provenance of one written clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub output_path: PathBuf,
    /// None for background-only clips
    pub word_source: Option<PathBuf>,
    pub noise_source: PathBuf,
    /// Start of the noise slice, in samples at the output rate
    pub noise_offset: usize,
}

/// Result of generating one output category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub name: String,
    pub kind: CategoryKind,
    /// Candidate source files after truncation to the requested count
    pub source_count: usize,
    pub clips: Vec<ClipRecord>,
}

impl CategoryReport {
    pub fn clips_written(&self) -> usize {
        self.clips.len()
    }
}

/// Output of a full curation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationSummary {
    pub out_dir: PathBuf,
    pub params: MixParams,
    pub num_samples: usize,
    pub seed: Option<u64>,
    pub targets: Vec<WordLabel>,
    pub unknown_labels: Vec<WordLabel>,
    pub noise_files: usize,
    pub categories: Vec<CategoryReport>,
}

impl CurationSummary {
    pub fn total_clips(&self) -> usize {
        self.categories.iter().map(|c| c.clips_written()).sum()
    }
}
