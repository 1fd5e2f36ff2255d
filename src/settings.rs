//! Player preferences
//!
//! Stored as a small JSON document next to the binary (or wherever the shell
//! chooses). Missing fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameResult;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start with audio muted
    pub start_muted: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Simulation ===
    /// Fixed obstacle layout seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.6,
            sfx_volume: 0.8,
            start_muted: false,
            show_fps: true,
            seed: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> GameResult<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a file, falling back to defaults when it is missing or bad
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> GameResult<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp volumes into range, warning about anything out of it
    fn sanitize(&mut self) {
        for (name, volume) in [
            ("master_volume", &mut self.master_volume),
            ("music_volume", &mut self.music_volume),
            ("sfx_volume", &mut self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&*volume) {
                log::warn!("{} {} out of range, clamping", name, volume);
                *volume = if volume.is_nan() { 1.0 } else { volume.clamp(0.0, 1.0) };
            }
        }
    }
}
