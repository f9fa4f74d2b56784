//! mrfreeze - phase-vocoder spectral freeze
//!
//! Captures the spectrum of a live signal at one instant and sustains it
//! indefinitely as a drone, while the freeze can be engaged and released in
//! real time.
//!
//! ## Features
//!
//! - **Streaming engine**: `write` any number of frames, `read` the same
//!   number back; framing and overlap-add survive arbitrary chunking
//! - **Phase-coherent sustain**: per-bin phase velocity measured at capture
//!   keeps partials running at their own frequency forever
//! - **Fixed allocation**: ring buffers sized at construction, nothing grows
//!   on the audio path
//! - **Host adapter**: block queueing, dry/wet mix and fade envelope as a
//!   pedal would drive it
//! - **Offline renderer**: `mrfreeze render` freezes audio files from the
//!   command line
//!
//! ## Module Structure
//!
//! - `core` - Freeze engine, host processor, DSP utilities, file I/O
//! - `config` - Engine geometry, presets, host parameters, plan cache
//! - `cli` - Command-line interface
//! - `error` - Error type
//!
//! ## Quick Start
//!
//! ```rust
//! use mrfreeze::{EngineConfig, FreezeEngine};
//!
//! let engine = FreezeEngine::new(EngineConfig::new(1).with_fft_size(1024))?;
//!
//! let block: Vec<f32> = (0..128)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin())
//!     .collect();
//!
//! engine.write(&block)?;
//! let out = engine.read();
//! assert_eq!(out.len(), block.len());
//!
//! // Capture the spectrum at the next complete frame and sustain it
//! engine.enable();
//! # Ok::<(), mrfreeze::FreezeError>(())
//! ```
//!
//! ## Presets
//!
//! | Preset   | FFT size | Overlap | Use case                         |
//! |----------|----------|---------|----------------------------------|
//! | Standard | 2048     | 50%     | General material                 |
//! | Pedal    | 1024     | 50%     | Low latency, firmware default    |
//! | Wide     | 4096     | 75%     | Smooth pads from long frames     |

// Freeze engine and DSP
pub mod core;

// Command-line interface
pub mod cli;

// Configuration and presets
pub mod config;

pub mod error;

pub use config::{EngineConfig, FreezeParams, FreezePreset, PlanCache, ProcessorConfig, SynthesisGate};
pub use self::core::{FreezeEngine, FreezeProcessor, FreezeSnapshot, PlanSource, SpectralAnalyzer, Transform};
pub use error::FreezeError;
