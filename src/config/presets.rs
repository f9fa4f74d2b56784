// src/config/presets.rs
//
// Engine geometry, freeze presets and the synthesis gate setting

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FreezeError, Result};

/// Decides when frozen frames are synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisGate {
    /// Keep synthesizing once any capture has completed, even after
    /// `disable()`; the host envelope is responsible for silencing it
    #[default]
    Sticky,
    /// Synthesize only while the engine is enabled
    Active,
}

impl SynthesisGate {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sticky" | "latch" => Some(Self::Sticky),
            "active" | "gated" => Some(Self::Active),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sticky => "sticky",
            Self::Active => "active",
        }
    }
}

/// Preset geometries for common uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreezePreset {
    /// 2048-point frames at 50% overlap
    Standard,
    /// 1024-point frames at 50% overlap, the pedal firmware setting
    Pedal,
    /// 4096-point frames at 75% overlap for smooth, smeared pads
    Wide,
}

impl FreezePreset {
    pub fn all() -> Vec<Self> {
        vec![Self::Standard, Self::Pedal, Self::Wide]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" | "default" => Some(Self::Standard),
            "pedal" => Some(Self::Pedal),
            "wide" | "pad" => Some(Self::Wide),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Pedal => "pedal",
            Self::Wide => "wide",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "Balanced resolution for general material",
            Self::Pedal => "Short frames, low latency (pedal firmware setting)",
            Self::Wide => "Long frames with dense overlap for sustained pads",
        }
    }

    pub fn fft_size(&self) -> usize {
        match self {
            Self::Standard => 2048,
            Self::Pedal => 1024,
            Self::Wide => 4096,
        }
    }

    pub fn overlap_rate(&self) -> f32 {
        match self {
            Self::Standard | Self::Pedal => 0.5,
            Self::Wide => 0.75,
        }
    }
}

/// Construction parameters of a [`FreezeEngine`](crate::FreezeEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interleaved channel count
    pub channels: usize,
    /// Analysis frame length in samples
    pub fft_size: usize,
    /// Fraction of a frame shared with the next one, in `[0, 1)`
    pub overlap_rate: f32,
    /// Most frames per channel that may be written between two reads
    pub max_burst: usize,
    /// Optional plan cache manifest, read best-effort
    pub plan_cache: Option<PathBuf>,
    pub synthesis_gate: SynthesisGate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channels: 1,
            fft_size: Self::DEFAULT_FFT_SIZE,
            overlap_rate: Self::DEFAULT_OVERLAP_RATE,
            max_burst: Self::DEFAULT_MAX_BURST,
            plan_cache: None,
            synthesis_gate: SynthesisGate::default(),
        }
    }
}

impl EngineConfig {
    pub const DEFAULT_FFT_SIZE: usize = 2048;
    pub const DEFAULT_OVERLAP_RATE: f32 = 0.5;
    pub const DEFAULT_MAX_BURST: usize = 2048;

    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            ..Default::default()
        }
    }

    pub fn from_preset(preset: FreezePreset, channels: usize) -> Self {
        Self::new(channels)
            .with_fft_size(preset.fft_size())
            .with_overlap_rate(preset.overlap_rate())
    }

    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    pub fn with_overlap_rate(mut self, overlap_rate: f32) -> Self {
        self.overlap_rate = overlap_rate;
        self
    }

    pub fn with_max_burst(mut self, max_burst: usize) -> Self {
        self.max_burst = max_burst;
        self
    }

    pub fn with_plan_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.plan_cache = Some(path.into());
        self
    }

    pub fn with_synthesis_gate(mut self, gate: SynthesisGate) -> Self {
        self.synthesis_gate = gate;
        self
    }

    /// Samples between consecutive analysis frames, `fft_size * (1 - overlap)`
    pub fn hop_size(&self) -> usize {
        (self.fft_size as f64 * (1.0 - self.overlap_rate as f64)) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 {
            return Err(FreezeError::Config("channel count must be positive".to_string()));
        }
        if self.fft_size < 2 || self.fft_size % 2 != 0 {
            return Err(FreezeError::Config(format!(
                "fft size must be even and at least 2, got {}",
                self.fft_size
            )));
        }
        if !(0.0..1.0).contains(&self.overlap_rate) {
            return Err(FreezeError::Config(format!(
                "overlap rate must be in [0, 1), got {}",
                self.overlap_rate
            )));
        }
        let hop = self.hop_size();
        if hop == 0 || hop > self.fft_size {
            return Err(FreezeError::Config(format!(
                "overlap rate {} leaves no hop for a {}-point frame",
                self.overlap_rate, self.fft_size
            )));
        }
        if self.max_burst == 0 {
            return Err(FreezeError::Config("max burst must be positive".to_string()));
        }
        Ok(())
    }

    /// Load from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| FreezeError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }
}
