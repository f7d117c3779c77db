//! Source selection: which recording and which noise file feed each output
//! clip.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::audio::io::wav_duration;
use crate::corpus::list_wav_files;
use crate::error::CurateError;

/// Shuffled, truncated recordings of one output category.
///
/// Output index `i` reads `paths[i % len]`, so a pool smaller than the
/// requested count is cycled in its shuffled order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePool {
    paths: Vec<PathBuf>,
}

impl SourcePool {
    /// Shuffle `candidates` and keep at most `count` of them.
    pub fn draw(candidates: &[PathBuf], count: usize, rng: &mut StdRng) -> Self {
        let mut paths = candidates.to_vec();
        paths.shuffle(rng);
        paths.truncate(count);
        Self { paths }
    }

    /// Round-robin source for output `index`; None for an empty pool.
    pub fn source_for(&self, index: usize) -> Option<&Path> {
        if self.paths.is_empty() {
            return None;
        }
        Some(&self.paths[index % self.paths.len()])
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Background noise recordings, built once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct NoisePool {
    paths: Vec<PathBuf>,
}

impl NoisePool {
    /// Collect the WAV files in `noise_dir` that last at least
    /// `min_duration` seconds, shuffle them, and keep at most `count`.
    ///
    /// Files that are too short or whose header cannot be read are logged
    /// and left out. An empty result is an error.
    pub fn build(
        noise_dir: &Path,
        count: usize,
        min_duration: f64,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let candidates = list_wav_files(noise_dir)
            .with_context(|| format!("Failed to list background noise in {}", noise_dir.display()))?;

        let mut paths = Vec::with_capacity(candidates.len());
        for path in candidates {
            match wav_duration(&path) {
                Ok(dur) if dur + 1e-9 >= min_duration => paths.push(path),
                Ok(dur) => log::warn!(
                    "Skipping noise file {} ({:.3}s, clips need {:.3}s)",
                    path.display(),
                    dur,
                    min_duration
                ),
                Err(e) => log::warn!("Skipping noise file: {:#}", e),
            }
        }

        paths.shuffle(rng);
        paths.truncate(count);
        if paths.is_empty() {
            return Err(CurateError::EmptyNoisePool(noise_dir.to_path_buf()).into());
        }
        log::info!("Using {} background noise file(s)", paths.len());
        Ok(Self { paths })
    }

    /// Pool from explicit paths, in the given order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Strategy for picking the noise file behind output clip `index`.
pub trait NoiseSelector {
    /// Panics on an empty pool; `NoisePool::build` never returns one.
    fn pick<'a>(&mut self, pool: &'a NoisePool, index: usize, rng: &mut StdRng) -> &'a Path;
}

/// Cycle through the pool in order. Used for background-only clips so every
/// noise file is covered evenly.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundRobinNoise;

impl NoiseSelector for RoundRobinNoise {
    fn pick<'a>(&mut self, pool: &'a NoisePool, index: usize, _rng: &mut StdRng) -> &'a Path {
        &pool.paths[index % pool.paths.len()]
    }
}

/// Independent uniform draw per clip. Used when mixing under words so the
/// noise is decorrelated from the word order.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNoise;

impl NoiseSelector for RandomNoise {
    fn pick<'a>(&mut self, pool: &'a NoisePool, _index: usize, rng: &mut StdRng) -> &'a Path {
        &pool.paths[rng.gen_range(0..pool.paths.len())]
    }
}
