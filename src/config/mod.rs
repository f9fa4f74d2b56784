//! Configuration module for mrfreeze

mod params;
mod plan_cache;
mod presets;

pub use params::{db_to_gain, FreezeParams, ProcessorConfig};
pub use plan_cache::PlanCache;
pub use presets::{EngineConfig, FreezePreset, SynthesisGate};
