//! Clip selection and mixing.

pub mod engine;
pub mod select;

pub use engine::{clip_file_name, mix_clip, produce_background, produce_word_category};
pub use select::{NoisePool, NoiseSelector, RandomNoise, RoundRobinNoise, SourcePool};
