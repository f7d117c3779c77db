//! Curation pipeline: scan the corpus, stage the output tree, and produce
//! background, target, and unknown clips in that order.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::corpus::{SourceCatalog, UNKNOWN_CATEGORY};
use crate::error::CurateError;
use crate::mixing::{NoisePool, produce_background, produce_word_category};
use crate::stage::stage_output_root;
use crate::types::{CategoryKind, CurationSummary, MixParams};

/// Configuration for one curation run.
#[derive(Debug, Clone)]
pub struct CurateConfig {
    /// Comma-separated target words
    pub targets: String,
    /// Clips per output category
    pub num_samples: usize,
    pub params: MixParams,
    pub noise_dir: PathBuf,
    pub out_dir: PathBuf,
    pub input_dirs: Vec<PathBuf>,
    pub seed: Option<u64>,
}

impl CurateConfig {
    pub fn validate(&self) -> Result<(), CurateError> {
        let invalid = |msg: String| -> Result<(), CurateError> { Err(CurateError::InvalidConfig(msg)) };
        let p = &self.params;
        if self.num_samples == 0 {
            return invalid("number of samples must be at least 1".into());
        }
        if !(p.sample_time.is_finite() && p.sample_time > 0.0) {
            return invalid(format!("sample time must be positive, got {}", p.sample_time));
        }
        if p.sample_rate == 0 {
            return invalid("sample rate must be positive".into());
        }
        if p.clip_len() == 0 {
            return invalid(format!(
                "{}s at {} Hz is shorter than one sample",
                p.sample_time, p.sample_rate
            ));
        }
        if !p.word_vol.is_finite() || !p.noise_vol.is_finite() {
            return invalid("volumes must be finite numbers".into());
        }
        if self.input_dirs.is_empty() {
            return invalid("at least one input directory is required".into());
        }
        Ok(())
    }
}

/// Run the full pipeline with a generator seeded from `config.seed`, or from
/// system entropy when no seed is set.
///
/// `confirm` is asked before an existing output directory is deleted.
pub fn process<F>(config: &CurateConfig, confirm: F) -> Result<CurationSummary>
where
    F: FnOnce(&Path) -> bool,
{
    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    process_with_rng(config, confirm, &mut rng)
}

/// Run the full pipeline, drawing every random choice from `rng`.
///
/// Nothing is written until the targets are validated and the noise pool is
/// non-empty.
pub fn process_with_rng<F>(
    config: &CurateConfig,
    confirm: F,
    rng: &mut StdRng,
) -> Result<CurationSummary>
where
    F: FnOnce(&Path) -> bool,
{
    config.validate()?;
    let params = &config.params;
    let count = config.num_samples;

    let catalog = SourceCatalog::scan(&config.input_dirs);
    let partition = catalog.partition(&config.targets)?;
    log::info!(
        "Targets: {}; unknown pool: {} word(s)",
        partition.targets.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", "),
        partition.unknown.len()
    );

    let noise = NoisePool::build(&config.noise_dir, count, params.sample_time, rng)?;

    stage_output_root(&config.out_dir, confirm)?;

    let mut categories = Vec::with_capacity(partition.targets.len() + 2);
    categories.push(produce_background(&config.out_dir, &noise, count, params, rng)?);

    for target in &partition.targets {
        categories.push(produce_word_category(
            &config.out_dir,
            target.as_str(),
            CategoryKind::Target,
            catalog.paths(target),
            &noise,
            count,
            params,
            rng,
        )?);
    }

    let unknown_paths = partition.unknown_paths(&catalog);
    categories.push(produce_word_category(
        &config.out_dir,
        UNKNOWN_CATEGORY,
        CategoryKind::Unknown,
        &unknown_paths,
        &noise,
        count,
        params,
        rng,
    )?);

    let summary = CurationSummary {
        out_dir: config.out_dir.clone(),
        params: *params,
        num_samples: count,
        seed: config.seed,
        targets: partition.targets.clone(),
        unknown_labels: partition.unknown.clone(),
        noise_files: noise.len(),
        categories,
    };
    log::info!(
        "Wrote {} clip(s) in {} categories to {}",
        summary.total_clips(),
        summary.categories.len(),
        config.out_dir.display()
    );
    Ok(summary)
}
