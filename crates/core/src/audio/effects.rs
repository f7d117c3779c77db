//! Signal shaping for mixed clips: fixed-length fitting, noise slicing,
//! volume-scaled mixing.

use rand::Rng;
use rand::rngs::StdRng;

/// Zero-pad at the end or truncate so the result has exactly `len` samples.
///
/// No centering and no fade: the first `len` samples are kept as-is.
pub fn fit_length(mut samples: Vec<f64>, len: usize) -> Vec<f64> {
    samples.resize(len, 0.0);
    samples
}

/// Silent signal of `len` samples.
pub fn silence(len: usize) -> Vec<f64> {
    vec![0.0; len]
}

/// Draw a uniform start offset so that `[start, start + len)` fits inside a
/// signal of `total` samples.
///
/// Returns None when the signal is shorter than `len`.
pub fn draw_offset(total: usize, len: usize, rng: &mut StdRng) -> Option<usize> {
    let max_start = total.checked_sub(len)?;
    Some(rng.gen_range(0..=max_start))
}

/// Cut a random `len`-sample slice out of a noise signal.
///
/// Returns (slice, offset). Noise shorter than `len` is zero-padded from
/// offset 0; this only happens when resampling trims a few edge samples off
/// a file whose header duration was long enough.
pub fn noise_slice(noise: &[f64], len: usize, rng: &mut StdRng) -> (Vec<f64>, usize) {
    match draw_offset(noise.len(), len, rng) {
        Some(start) => (noise[start..start + len].to_vec(), start),
        None => {
            log::debug!(
                "Noise signal has {} samples, {} needed; zero-padding",
                noise.len(),
                len
            );
            (fit_length(noise.to_vec(), len), 0)
        }
    }
}

/// Blend word and noise 50/50, each scaled by its own volume.
///
/// `out[k] = 0.5 * word_vol * word[k] + 0.5 * noise_vol * noise[k]`.
/// Nothing is clipped or normalized here. Output length is the shorter of
/// the two inputs; callers pass equal lengths.
pub fn mix_signals(word: &[f64], noise: &[f64], word_vol: f64, noise_vol: f64) -> Vec<f64> {
    word.iter()
        .zip(noise.iter())
        .map(|(&w, &n)| 0.5 * word_vol * w + 0.5 * noise_vol * n)
        .collect()
}
