//! WAV fixtures shared by the unit tests.

use std::path::Path;

/// Write `samples` as 16-bit PCM, duplicating each sample across `channels`.
pub fn write_test_wav(path: &Path, samples: &[f64], sample_rate: u32, channels: u16) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * 32767.0).round() as i16;
        for _ in 0..channels {
            writer.write_sample(v).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// Write a constant-valued mono clip of `len` samples.
pub fn write_constant_wav(path: &Path, value: f64, len: usize, sample_rate: u32) {
    write_test_wav(path, &vec![value; len], sample_rate, 1);
}

/// Read a hound-readable WAV back as normalized f64 samples.
pub fn read_wav(path: &Path) -> (Vec<f64>, u32) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.unwrap() as f64 / max_val)
                .collect()
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.unwrap() as f64)
            .collect(),
    };
    (samples, spec.sample_rate)
}

pub fn sine(freq: f64, len: usize, sample_rate: u32, amplitude: f64) -> Vec<f64> {
    (0..len)
        .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin() * amplitude)
        .collect()
}
