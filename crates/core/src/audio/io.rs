//! Audio I/O: WAV decode to mono, header probing, resampling, and encoding
//! at every supported bit depth.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};

use crate::types::BitDepth;

/// Decode a WAV file to mono f64 samples at `target_sr`.
///
/// - Integer PCM is normalized to [-1, 1], float PCM is passed through
/// - Multi-channel audio is averaged down to one channel
/// - Resamples with rubato when the file rate differs from `target_sr`
pub fn decode_mono(path: &Path, target_sr: u32) -> Result<Vec<f64>> {
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
    use symphonia::core::errors::Error as SymphError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Unsupported WAV file: {}", path.display()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .with_context(|| format!("No audio track in {}", path.display()))?;

    let track_id = track.id;
    let source_sr = track
        .codec_params
        .sample_rate
        .with_context(|| format!("Unknown sample rate in {}", path.display()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .with_context(|| format!("Unsupported WAV encoding: {}", path.display()))?;

    let mut mono: Vec<f64> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphError::ResetRequired) => break,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count().max(1);
                let num_frames = decoded.frames();
                let mut sample_buf = SampleBuffer::<f64>::new(num_frames as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                let interleaved = sample_buf.samples();

                if channels > 1 {
                    for frame in interleaved.chunks_exact(channels) {
                        mono.push(frame.iter().sum::<f64>() / channels as f64);
                    }
                } else {
                    mono.extend_from_slice(interleaved);
                }
            }
            Err(SymphError::DecodeError(msg)) => {
                log::debug!("Skipping undecodable packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to decode {}", path.display()));
            }
        }
    }

    if source_sr == target_sr {
        return Ok(mono);
    }
    resample(&mono, source_sr, target_sr)
        .with_context(|| format!("Failed to resample {}", path.display()))
}

/// Duration of a WAV file in seconds, read from the header only.
///
/// Probes with the same reader as `decode_mono`, so any file that decodes
/// also reports a duration.
pub fn wav_duration(path: &Path) -> Result<f64> {
    use symphonia::core::codecs::CODEC_TYPE_NULL;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Unsupported WAV file: {}", path.display()))?;

    let params = &probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .with_context(|| format!("No audio track in {}", path.display()))?
        .codec_params;

    let sample_rate = params
        .sample_rate
        .filter(|&sr| sr > 0)
        .with_context(|| format!("Unknown sample rate in {}", path.display()))?;
    let frames = params
        .n_frames
        .with_context(|| format!("Unknown length of {}", path.display()))?;
    Ok(frames as f64 / sample_rate as f64)
}

/// Resample audio from source sample rate to target sample rate.
///
/// Uses rubato for high-quality resampling.
pub fn resample(samples: &[f64], from_sr: u32, to_sr: u32) -> Result<Vec<f64>> {
    if from_sr == to_sr {
        return Ok(samples.to_vec());
    }

    if samples.is_empty() {
        return Ok(vec![]);
    }

    use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_sr as f64 / from_sr as f64;
    let mut resampler = SincFixedIn::<f64>::new(
        ratio,
        2.0, // max relative ratio (allows some flexibility)
        params,
        samples.len(),
        1, // mono
    )?;

    let input = vec![samples.to_vec()];
    let output = resampler.process(&input, None)?;

    Ok(output.into_iter().next().unwrap_or_default())
}

/// Write mono f64 samples as a WAV file with the given encoding.
///
/// Integer encodings clip to [-1, 1] before conversion; float encodings store
/// the values unchanged. Creates parent directories if needed.
pub fn write_clip(path: &Path, samples: &[f64], sample_rate: u32, depth: BitDepth) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    if depth == BitDepth::Double {
        return write_f64_wav(path, samples, sample_rate);
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: depth.bits_per_sample(),
        sample_format: if depth.is_float() { SampleFormat::Float } else { SampleFormat::Int },
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for &sample in samples {
        match depth {
            BitDepth::PcmU8 => writer.write_sample(quantize(sample, 8) as i8)?,
            BitDepth::Pcm16 => writer.write_sample(quantize(sample, 16) as i16)?,
            BitDepth::Pcm24 => writer.write_sample(quantize(sample, 24) as i32)?,
            BitDepth::Pcm32 => writer.write_sample(quantize(sample, 32) as i32)?,
            BitDepth::Float => writer.write_sample(sample as f32)?,
            BitDepth::Double => unreachable!("64-bit float is written by write_f64_wav"),
        }
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {}", path.display()))?;
    Ok(())
}

/// Clip to [-1, 1] and scale to a signed integer of `bits` width.
fn quantize(sample: f64, bits: u32) -> i64 {
    let max_val = ((1i64 << (bits - 1)) - 1) as f64;
    (sample.clamp(-1.0, 1.0) * max_val).round() as i64
}

/// hound has no 64-bit float support, so DOUBLE clips get a hand-built
/// IEEE-float RIFF header with a fact chunk.
fn write_f64_wav(path: &Path, samples: &[f64], sample_rate: u32) -> Result<()> {
    let too_large = || anyhow::anyhow!("DOUBLE clip too large for a WAV header: {}", path.display());
    let frames = u32::try_from(samples.len()).map_err(|_| too_large())?;
    let data_len = frames.checked_mul(8).ok_or_else(too_large)?;
    let riff_len = data_len.checked_add(4 + (8 + 18) + (8 + 4) + 8).ok_or_else(too_large)?;
    let byte_rate = sample_rate.checked_mul(8).with_context(|| {
        format!("Sample rate {} Hz too high for a DOUBLE WAV header", sample_rate)
    })?;

    let mut wav = Vec::with_capacity(8 + riff_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&riff_len.to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&18u32.to_le_bytes());  // fmt size
    wav.extend_from_slice(&3u16.to_le_bytes());   // IEEE float
    wav.extend_from_slice(&1u16.to_le_bytes());   // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes()); // byte-rate
    wav.extend_from_slice(&8u16.to_le_bytes());   // block align
    wav.extend_from_slice(&64u16.to_le_bytes());  // bits/sample
    wav.extend_from_slice(&0u16.to_le_bytes());   // cbSize
    wav.extend_from_slice(b"fact");
    wav.extend_from_slice(&4u32.to_le_bytes());
    wav.extend_from_slice(&frames.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    file.write_all(&wav)
        .with_context(|| format!("Failed to write WAV file: {}", path.display()))?;
    Ok(())
}
