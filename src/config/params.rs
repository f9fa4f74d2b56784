// src/config/params.rs
//
// Host-facing settings of the block processor

use serde::{Deserialize, Serialize};

use super::presets::{EngineConfig, FreezePreset};

/// Per-block control values, as a host would read them from its ports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreezeParams {
    /// Freeze footswitch state
    pub freeze: bool,
    /// Gain applied to the frozen signal, in dB
    pub freeze_gain_db: f32,
    /// Gain applied to the dry signal, in dB; at or below -48 dB the dry path is muted
    pub dry_gain_db: f32,
    /// Seconds to ramp the frozen signal up after engaging
    pub fade_in_secs: f32,
    /// Seconds to ramp the frozen signal down after releasing
    pub fade_out_secs: f32,
}

impl Default for FreezeParams {
    fn default() -> Self {
        Self {
            freeze: false,
            freeze_gain_db: 0.0,
            dry_gain_db: 0.0,
            fade_in_secs: 0.5,
            fade_out_secs: 0.5,
        }
    }
}

impl FreezeParams {
    /// Dry gain at or below this level mutes the dry path
    pub const DRY_MUTE_DB: f32 = -48.0;

    pub fn frozen(mut self, freeze: bool) -> Self {
        self.freeze = freeze;
        self
    }

    pub fn freeze_gain(&self) -> f32 {
        db_to_gain(self.freeze_gain_db)
    }

    pub fn dry_gain(&self) -> f32 {
        if self.dry_gain_db <= Self::DRY_MUTE_DB {
            0.0
        } else {
            db_to_gain(self.dry_gain_db)
        }
    }
}

/// Construction parameters of a [`FreezeProcessor`](crate::FreezeProcessor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub sample_rate: u32,
    /// Largest host block, in frames
    pub block_size: usize,
    /// Engine geometry; `max_burst` is replaced by the hop size
    pub engine: EngineConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 128,
            engine: EngineConfig::from_preset(FreezePreset::Pedal, 1),
        }
    }
}

impl ProcessorConfig {
    pub fn new(sample_rate: u32, engine: EngineConfig) -> Self {
        Self {
            sample_rate,
            engine,
            ..Default::default()
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }
}

/// Convert decibels to a linear gain
pub fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gains() {
        let params = FreezeParams::default();
        assert!((params.freeze_gain() - 1.0).abs() < 1e-6);
        assert!((params.dry_gain() - 1.0).abs() < 1e-6);

        let muted = FreezeParams { dry_gain_db: -48.0, ..Default::default() };
        assert_eq!(muted.dry_gain(), 0.0);

        let quiet = FreezeParams { dry_gain_db: -20.0, ..Default::default() };
        assert!((quiet.dry_gain() - 0.1).abs() < 1e-5);
    }
}
