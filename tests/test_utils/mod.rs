#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::PathBuf;
use std::process::Command;
use uuid::Uuid;

use mrfreeze::SpectralAnalyzer;

pub const SAMPLE_RATE: u32 = 48000;

pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mrfreeze"))
}

pub fn run_mrfreeze() -> Command {
    Command::new(get_binary_path())
}

/// Mono sine of `frames` samples
pub fn sine(freq: f32, amplitude: f32, frames: usize) -> Vec<f32> {
    sine_from(freq, amplitude, 0, frames)
}

/// Mono sine continuing from sample index `start`
pub fn sine_from(freq: f32, amplitude: f32, start: usize, frames: usize) -> Vec<f32> {
    (start..start + frames)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
        .collect()
}

/// Interleave equal-length channels
pub fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    let frames = channels[0].len();
    let mut out = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        for ch in channels {
            out.push(ch[i]);
        }
    }
    out
}

/// Every `channels`-th sample starting at `channel`
pub fn channel(samples: &[f32], channels: usize, channel: usize) -> Vec<f32> {
    samples.iter().skip(channel).step_by(channels).copied().collect()
}

/// Dominant frequency of the last `fft_size` samples
pub fn dominant_frequency(samples: &[f32], fft_size: usize) -> Option<f32> {
    let tail = &samples[samples.len().saturating_sub(fft_size)..];
    SpectralAnalyzer::new(fft_size).dominant_frequency(tail, SAMPLE_RATE)
}

pub fn bin_width(fft_size: usize) -> f32 {
    SAMPLE_RATE as f32 / fft_size as f32
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Unique scratch path under the system temp directory
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mrfreeze-{}-{}", Uuid::new_v4(), name))
}
