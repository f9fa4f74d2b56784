//! Digital Signal Processing utilities

pub mod fft;
pub mod ring_buffer;
pub mod windows;

pub use fft::{PlanSource, Transform};
pub use ring_buffer::{OverlapAddBuffer, RingBuffer};
pub use windows::{create_window, squared_overlap_sum, synthesis_window, WindowType};

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Spectral analyzer for measuring rendered audio
pub struct SpectralAnalyzer {
    fft_size: usize,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
}

impl SpectralAnalyzer {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft_size,
            window: create_window(fft_size, WindowType::Hann),
            fft: planner.plan_fft_forward(fft_size),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    /// Magnitude spectrum of one Hann-windowed frame (zero-padded if short)
    pub fn magnitude_spectrum(&mut self, samples: &[f32]) -> Vec<f32> {
        self.buffer.iter_mut().for_each(|c| *c = Complex::new(0.0, 0.0));
        for ((slot, &s), &w) in self.buffer.iter_mut().zip(samples).zip(&self.window) {
            slot.re = s * w;
        }

        self.fft.process(&mut self.buffer);

        self.buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    /// Frequency of the strongest bin above DC, or `None` for silence
    pub fn dominant_frequency(&mut self, samples: &[f32], sample_rate: u32) -> Option<f32> {
        let spectrum = self.magnitude_spectrum(samples);
        let (bin, &peak) = spectrum
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))?;

        if peak <= 1e-6 {
            return None;
        }
        Some(bin as f32 * self.bin_resolution(sample_rate))
    }

    /// Width of one bin in Hz
    pub fn bin_resolution(&self, sample_rate: u32) -> f32 {
        sample_rate as f32 / self.fft_size as f32
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

/// Root-mean-square level
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

/// Largest absolute sample value
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Level in dBFS, floored at -200 dB
pub fn to_db(level: f32) -> f32 {
    if level > 1e-10 {
        20.0 * level.log10()
    } else {
        -200.0
    }
}
