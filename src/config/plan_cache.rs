// src/config/plan_cache.rs
//
// Transform plan cache manifest. The engine only reads it; the `plan-cache`
// CLI command is the sole writer.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FreezeError, Result};

/// On-disk manifest of transform lengths that have been planned before
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanCache {
    /// Manifest format version
    pub version: u32,
    /// Sample precision the plans were made for
    pub precision: String,
    /// Real transform lengths covered by this cache
    pub lengths: Vec<usize>,
}

impl PlanCache {
    pub const VERSION: u32 = 1;
    pub const PRECISION: &'static str = "f32";
    pub const FILE_NAME: &'static str = "mrfreeze.plans.json";

    pub fn new(lengths: impl IntoIterator<Item = usize>) -> Self {
        let mut lengths: Vec<usize> = lengths.into_iter().collect();
        lengths.sort_unstable();
        lengths.dedup();
        Self {
            version: Self::VERSION,
            precision: Self::PRECISION.to_string(),
            lengths,
        }
    }

    /// Per-user cache location, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("mrfreeze").join(Self::FILE_NAME))
    }

    /// Read a manifest from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| FreezeError::PlanCache {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&json).map_err(|e| FreezeError::PlanCache {
            path: path.to_path_buf(),
            reason: format!("unreadable manifest: {}", e),
        })
    }

    /// Read a manifest and confirm it covers a transform of `fft_size`
    pub fn load_for(path: &Path, fft_size: usize) -> Result<Self> {
        let cache = Self::load(path)?;
        cache.check(path, fft_size)?;
        Ok(cache)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| FreezeError::PlanCache {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn covers(&self, fft_size: usize) -> bool {
        self.lengths.contains(&fft_size)
    }

    fn check(&self, path: &Path, fft_size: usize) -> Result<()> {
        let reason = if self.version != Self::VERSION {
            format!("version {} is not supported (expected {})", self.version, Self::VERSION)
        } else if self.precision != Self::PRECISION {
            format!("precision {} does not match {}", self.precision, Self::PRECISION)
        } else if !self.covers(fft_size) {
            format!("no plan for a {}-point transform", fft_size)
        } else {
            return Ok(());
        };

        Err(FreezeError::PlanCache {
            path: path.to_path_buf(),
            reason,
        })
    }
}
