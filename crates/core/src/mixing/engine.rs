//! Per-category clip production: resolve sources, mix, persist.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;

use crate::audio::effects::{fit_length, mix_signals, noise_slice, silence};
use crate::audio::io::{decode_mono, write_clip};
use crate::corpus::NOISE_CATEGORY;
use crate::mixing::select::{NoisePool, NoiseSelector, RandomNoise, RoundRobinNoise, SourcePool};
use crate::types::{CategoryKind, CategoryReport, ClipRecord, MixParams};

/// Build one mixed waveform.
///
/// With no word the word signal is silence, leaving `0.5 * noise_vol` times
/// a random noise slice. Returns (samples, noise offset); the sample count
/// is always `params.clip_len()`.
pub fn mix_clip(
    word_path: Option<&Path>,
    noise_path: &Path,
    params: &MixParams,
    rng: &mut StdRng,
) -> Result<(Vec<f64>, usize)> {
    let len = params.clip_len();

    let word = match word_path {
        Some(path) => fit_length(decode_mono(path, params.sample_rate)?, len),
        None => silence(len),
    };

    let noise = decode_mono(noise_path, params.sample_rate)?;
    let (noise, offset) = noise_slice(&noise, len, rng);

    Ok((mix_signals(&word, &noise, params.word_vol, params.noise_vol), offset))
}

/// `<prefix>.<index>.wav` with the index zero-padded to the digit count of
/// `count`.
pub fn clip_file_name(prefix: &str, index: usize, count: usize) -> String {
    let digits = count.to_string().len();
    format!("{}.{:0width$}.wav", prefix, index, width = digits)
}

/// Write `count` background-only clips to `<out_dir>/_noise`, cycling
/// through the noise pool in order.
pub fn produce_background(
    out_dir: &Path,
    noise: &NoisePool,
    count: usize,
    params: &MixParams,
    rng: &mut StdRng,
) -> Result<CategoryReport> {
    log::info!("Gathering random background noise snippets ({} files)", count);
    let clips = produce(
        &out_dir.join(NOISE_CATEGORY),
        NOISE_CATEGORY,
        None,
        noise,
        &mut RoundRobinNoise,
        count,
        params,
        rng,
    )?;
    Ok(CategoryReport {
        name: NOISE_CATEGORY.to_string(),
        kind: CategoryKind::Background,
        source_count: noise.len(),
        clips,
    })
}

/// Write `count` clips to `<out_dir>/<name>`, each a recording from
/// `candidates` mixed over a randomly chosen noise file.
///
/// Candidates are shuffled once and truncated to `count`; a smaller pool is
/// reused round-robin. With no candidates the directory is created and
/// nothing is written.
#[allow(clippy::too_many_arguments)]
pub fn produce_word_category(
    out_dir: &Path,
    name: &str,
    kind: CategoryKind,
    candidates: &[PathBuf],
    noise: &NoisePool,
    count: usize,
    params: &MixParams,
    rng: &mut StdRng,
) -> Result<CategoryReport> {
    let category_dir = out_dir.join(name);
    let sources = SourcePool::draw(candidates, count, rng);

    let clips = if sources.is_empty() {
        std::fs::create_dir_all(&category_dir)
            .with_context(|| format!("Failed to create directory: {}", category_dir.display()))?;
        log::warn!("No source files for '{}', skipping", name);
        Vec::new()
    } else {
        log::info!("Mixing: {} ({} files)", name, count);
        produce(
            &category_dir,
            name,
            Some(&sources),
            noise,
            &mut RandomNoise,
            count,
            params,
            rng,
        )?
    };

    Ok(CategoryReport {
        name: name.to_string(),
        kind,
        source_count: sources.len(),
        clips,
    })
}

#[allow(clippy::too_many_arguments)]
fn produce(
    category_dir: &Path,
    prefix: &str,
    sources: Option<&SourcePool>,
    noise: &NoisePool,
    selector: &mut dyn NoiseSelector,
    count: usize,
    params: &MixParams,
    rng: &mut StdRng,
) -> Result<Vec<ClipRecord>> {
    std::fs::create_dir_all(category_dir)
        .with_context(|| format!("Failed to create directory: {}", category_dir.display()))?;

    let mut records = Vec::with_capacity(count);
    for i in 0..count {
        let noise_path = selector.pick(noise, i, rng);
        let word_path = sources.and_then(|s| s.source_for(i));

        let (samples, offset) = mix_clip(word_path, noise_path, params, rng)?;

        let output_path = category_dir.join(clip_file_name(prefix, i, count));
        write_clip(&output_path, &samples, params.sample_rate, params.bit_depth)?;
        log::debug!(
            "  {} <- {} + {} @{}",
            output_path.display(),
            word_path.map(|p| p.display().to_string()).unwrap_or_else(|| "silence".into()),
            noise_path.display(),
            offset
        );

        records.push(ClipRecord {
            output_path,
            word_source: word_path.map(Path::to_path_buf),
            noise_source: noise_path.to_path_buf(),
            noise_offset: offset,
        });
    }
    log::info!("  wrote {} clip(s) to {}", records.len(), category_dir.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{read_wav, write_constant_wav, write_test_wav};
    use crate::types::BitDepth;
    use rand::SeedableRng;

    const SR: u32 = 1000;

    fn params(word_vol: f64, noise_vol: f64) -> MixParams {
        MixParams {
            word_vol,
            noise_vol,
            sample_time: 0.5,
            sample_rate: SR,
            bit_depth: BitDepth::Float,
        }
    }

    #[test]
    fn test_clip_file_name_padding() {
        assert_eq!(clip_file_name("_noise", 0, 5), "_noise.0.wav");
        assert_eq!(clip_file_name("go", 7, 1500), "go.0007.wav");
        assert_eq!(clip_file_name("go", 999, 1000), "go.0999.wav");
        assert_eq!(clip_file_name("go", 10, 10), "go.10.wav");
    }

    #[test]
    fn test_mix_clip_constant_signals() {
        let dir = tempfile::tempdir().unwrap();
        let word = dir.path().join("word.wav");
        let noise = dir.path().join("noise.wav");
        write_constant_wav(&word, 0.5, 500, SR);
        write_constant_wav(&noise, -0.25, 2000, SR);
        let mut rng = StdRng::seed_from_u64(1);

        let p = params(0.8, 0.4);
        let (mixed, offset) = mix_clip(Some(&word), &noise, &p, &mut rng).unwrap();
        assert_eq!(mixed.len(), 500);
        assert!(offset <= 1500);
        let expected = 0.5 * 0.8 * 0.5 + 0.5 * 0.4 * -0.25;
        for s in &mixed {
            assert!((s - expected).abs() < 1e-4, "{} vs {}", s, expected);
        }
    }

    #[test]
    fn test_mix_clip_pads_short_word() {
        let dir = tempfile::tempdir().unwrap();
        let word = dir.path().join("word.wav");
        let noise = dir.path().join("noise.wav");
        write_constant_wav(&word, 0.5, 100, SR);
        write_constant_wav(&noise, 0.0, 1000, SR);
        let mut rng = StdRng::seed_from_u64(1);

        let (mixed, _) = mix_clip(Some(&word), &noise, &params(1.0, 1.0), &mut rng).unwrap();
        assert_eq!(mixed.len(), 500);
        assert!((mixed[99] - 0.25).abs() < 1e-4);
        assert_eq!(mixed[100], 0.0);
        assert_eq!(mixed[499], 0.0);
    }

    #[test]
    fn test_mix_clip_truncates_long_word() {
        let dir = tempfile::tempdir().unwrap();
        let word = dir.path().join("word.wav");
        let noise = dir.path().join("noise.wav");
        let ramp: Vec<f64> = (0..2000).map(|i| i as f64 / 4000.0).collect();
        write_test_wav(&word, &ramp, SR, 1);
        write_constant_wav(&noise, 0.0, 1000, SR);
        let mut rng = StdRng::seed_from_u64(1);

        let (mixed, _) = mix_clip(Some(&word), &noise, &params(2.0, 1.0), &mut rng).unwrap();
        assert_eq!(mixed.len(), 500);
        // first 500 samples kept, scaled by 0.5 * 2.0
        assert!((mixed[499] - 499.0 / 4000.0).abs() < 1e-3);
    }

    #[test]
    fn test_mix_clip_background_is_scaled_noise_slice() {
        let dir = tempfile::tempdir().unwrap();
        let noise = dir.path().join("noise.wav");
        let ramp: Vec<f64> = (0..1500).map(|i| i as f64 / 2000.0).collect();
        write_test_wav(&noise, &ramp, SR, 1);
        let mut rng = StdRng::seed_from_u64(4);

        let (mixed, offset) = mix_clip(None, &noise, &params(1.0, 0.6), &mut rng).unwrap();
        assert_eq!(mixed.len(), 500);
        assert!(offset <= 1000);
        for (k, s) in mixed.iter().enumerate() {
            let expected = 0.5 * 0.6 * ((offset + k) as f64 / 2000.0);
            assert!((s - expected).abs() < 1e-4, "sample {}: {} vs {}", k, s, expected);
        }
    }

    #[test]
    fn test_produce_background_round_robin() {
        let dir = tempfile::tempdir().unwrap();
        let n0 = dir.path().join("n0.wav");
        let n1 = dir.path().join("n1.wav");
        write_constant_wav(&n0, 0.2, 1000, SR);
        write_constant_wav(&n1, -0.2, 1000, SR);
        let pool = NoisePool::from_paths(vec![n0.clone(), n1.clone()]);
        let out = dir.path().join("out");
        let mut rng = StdRng::seed_from_u64(2);

        let report = produce_background(&out, &pool, 5, &params(1.0, 1.0), &mut rng).unwrap();
        assert_eq!(report.kind, CategoryKind::Background);
        assert_eq!(report.clips_written(), 5);
        for (i, clip) in report.clips.iter().enumerate() {
            assert_eq!(clip.word_source, None);
            assert_eq!(clip.noise_source, if i % 2 == 0 { n0.clone() } else { n1.clone() });
            assert!(clip.output_path.exists());
        }
        assert!(out.join("_noise").join("_noise.4.wav").exists());

        let (samples, sr) = read_wav(&out.join("_noise").join("_noise.1.wav"));
        assert_eq!(sr, SR);
        assert_eq!(samples.len(), 500);
        assert!((samples[0] - 0.5 * -0.2).abs() < 1e-4);
    }

    #[test]
    fn test_produce_word_category_reuses_pool() {
        let dir = tempfile::tempdir().unwrap();
        let words: Vec<PathBuf> = (0..3)
            .map(|i| {
                let p = dir.path().join(format!("w{}.wav", i));
                write_constant_wav(&p, 0.1 * (i + 1) as f64, 300, SR);
                p
            })
            .collect();
        let noise = dir.path().join("n.wav");
        write_constant_wav(&noise, 0.0, 800, SR);
        let pool = NoisePool::from_paths(vec![noise]);
        let out = dir.path().join("out");
        let mut rng = StdRng::seed_from_u64(8);

        let report = produce_word_category(
            &out, "go", CategoryKind::Target, &words, &pool, 7, &params(1.0, 1.0), &mut rng,
        )
        .unwrap();
        assert_eq!(report.source_count, 3);
        assert_eq!(report.clips_written(), 7);
        for i in 3..7 {
            assert_eq!(report.clips[i].word_source, report.clips[i % 3].word_source);
        }
        let distinct: std::collections::HashSet<_> =
            report.clips[..3].iter().map(|c| c.word_source.clone()).collect();
        assert_eq!(distinct.len(), 3);

        let mut files: Vec<String> = std::fs::read_dir(out.join("go"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        files.sort();
        assert_eq!(files, (0..7).map(|i| format!("go.{}.wav", i)).collect::<Vec<_>>());
    }

    #[test]
    fn test_produce_word_category_empty_sources_skips() {
        let dir = tempfile::tempdir().unwrap();
        let noise = dir.path().join("n.wav");
        write_constant_wav(&noise, 0.0, 800, SR);
        let pool = NoisePool::from_paths(vec![noise]);
        let out = dir.path().join("out");
        let mut rng = StdRng::seed_from_u64(8);

        let report = produce_word_category(
            &out, "_unknown", CategoryKind::Unknown, &[], &pool, 4, &params(1.0, 1.0), &mut rng,
        )
        .unwrap();
        assert_eq!(report.clips_written(), 0);
        assert!(out.join("_unknown").is_dir());
        assert_eq!(std::fs::read_dir(out.join("_unknown")).unwrap().count(), 0);
    }

    #[test]
    fn test_produce_pcm16_clips_loud_mix() {
        let dir = tempfile::tempdir().unwrap();
        let word = dir.path().join("w.wav");
        let noise = dir.path().join("n.wav");
        write_constant_wav(&word, 0.9, 500, SR);
        write_constant_wav(&noise, 0.9, 500, SR);
        let pool = NoisePool::from_paths(vec![noise]);
        let out = dir.path().join("out");
        let mut rng = StdRng::seed_from_u64(8);
        let p = MixParams { bit_depth: BitDepth::Pcm16, ..params(2.0, 2.0) };

        produce_word_category(&out, "go", CategoryKind::Target, &[word], &pool, 1, &p, &mut rng)
            .unwrap();
        let (samples, _) = read_wav(&out.join("go").join("go.0.wav"));
        assert_eq!(samples.len(), 500);
        assert!(samples.iter().all(|s| *s > 0.99 && *s <= 1.0));
    }
}
