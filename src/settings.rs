//! Runner settings
//!
//! Loaded from an optional JSON file. These control how a run is driven,
//! never how hard it is.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FRAME_DT;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum cosmetic particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 256,
            QualityPreset::Medium => 1024,
            QualityPreset::High => 4096,
        }
    }
}

/// Headless run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle budget preset
    pub quality: QualityPreset,
    /// RNG seed for the run
    pub seed: u64,
    /// Frames to simulate (stops early on game over)
    pub frames: u32,
    /// Seconds per frame
    pub frame_dt: f32,
    /// Let the demo bot play
    pub autopilot: bool,
    /// Log a status line every N frames (0 = never)
    pub log_every: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            seed: 0x5eed,
            frames: 60 * 120,
            frame_dt: DEFAULT_FRAME_DT,
            autopilot: true,
            log_every: 600,
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }

    /// Parse settings from JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults on error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) => {
                log::warn!("Could not read {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
