//! CLI argument parsing

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{EngineConfig, FreezeParams, FreezePreset, PlanCache, SynthesisGate};

#[derive(Parser, Debug)]
#[command(name = "mrfreeze")]
#[command(version, about = "Capture the spectrum of a moment and sustain it as a drone")]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Freeze audio files offline
    Render(RenderArgs),
    /// Write a transform plan cache manifest
    PlanCache(PlanCacheArgs),
    /// List available presets
    Presets,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Input file or directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for rendered files
    #[arg(short, long, default_value = "frozen")]
    pub output: PathBuf,

    /// Time in seconds at which the freeze engages
    #[arg(long, default_value_t = 1.0)]
    pub freeze_at: f32,

    /// Time in seconds at which the freeze releases (default: held to the end)
    #[arg(long)]
    pub release_at: Option<f32>,

    /// Seconds of silence appended to the input so the freeze can ring out
    #[arg(long, default_value_t = 4.0)]
    pub tail: f32,

    /// Geometry preset (standard, pedal, wide)
    #[arg(short, long, default_value = "standard")]
    pub preset: String,

    /// FFT size, overriding the preset
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Overlap rate in [0, 1), overriding the preset
    #[arg(long)]
    pub overlap: Option<f32>,

    /// Synthesis gate: sticky keeps the drone running under the fade-out,
    /// active cuts it on release
    #[arg(long, default_value = "sticky")]
    pub gate: String,

    /// Host block size in frames
    #[arg(long, default_value_t = 128)]
    pub block_size: usize,

    /// Frozen signal gain in dB
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub freeze_gain_db: f32,

    /// Dry signal gain in dB (-48 mutes)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub dry_gain_db: f32,

    /// Fade-in duration in seconds
    #[arg(long, default_value_t = 0.5)]
    pub fade_in: f32,

    /// Fade-out duration in seconds
    #[arg(long, default_value_t = 0.5)]
    pub fade_out: f32,

    /// Plan cache manifest (defaults to the per-user cache when present)
    #[arg(long, env = "MRFREEZE_PLAN_CACHE")]
    pub plan_cache: Option<PathBuf>,

    /// Engine configuration JSON; preset and geometry flags are ignored when set
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,
}

impl RenderArgs {
    /// Engine configuration for a file with `channels` channels
    pub fn engine_config(&self, channels: usize) -> Result<EngineConfig> {
        let gate = SynthesisGate::from_name(&self.gate)
            .with_context(|| format!("Unknown synthesis gate: {}", self.gate))?;

        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load engine config {}", path.display()))?,
            None => {
                let preset = FreezePreset::from_name(&self.preset)
                    .with_context(|| format!("Unknown preset: {}", self.preset))?;
                let mut config = EngineConfig::from_preset(preset, channels).with_synthesis_gate(gate);
                if let Some(fft_size) = self.fft_size {
                    config = config.with_fft_size(fft_size);
                }
                if let Some(overlap) = self.overlap {
                    config = config.with_overlap_rate(overlap);
                }
                config
            }
        };
        config.channels = channels;

        let plan_cache = self
            .plan_cache
            .clone()
            .or_else(|| PlanCache::default_path().filter(|p| p.exists()));
        if let Some(path) = plan_cache {
            config = config.with_plan_cache(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Host parameters for the block starting at `time_secs`
    pub fn params_at(&self, time_secs: f32) -> FreezeParams {
        let released = self.release_at.map(|t| time_secs >= t).unwrap_or(false);
        FreezeParams {
            freeze: time_secs >= self.freeze_at && !released,
            freeze_gain_db: self.freeze_gain_db,
            dry_gain_db: self.dry_gain_db,
            fade_in_secs: self.fade_in,
            fade_out_secs: self.fade_out,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PlanCacheArgs {
    /// Manifest path (default: per-user cache directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Transform lengths to record
    #[arg(long, num_args = 1.., default_values_t = [1024usize, 2048, 4096])]
    pub sizes: Vec<usize>,
}
