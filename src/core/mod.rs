//! Freeze engine, host adapter and DSP building blocks

pub mod decoder;
pub mod dsp;
pub mod engine;
pub mod envelope;
pub mod processor;

pub use decoder::{decode_audio, write_wav, AudioData};
pub use dsp::{PlanSource, SpectralAnalyzer, Transform};
pub use engine::{FreezeEngine, FreezeSnapshot};
pub use envelope::FadeEnvelope;
pub use processor::FreezeProcessor;
