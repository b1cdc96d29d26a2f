//! Game settings and preferences
//!
//! Persisted separately from level data, as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake when the player takes a hit
    pub screen_shake: bool,
    /// Explosion animations
    pub explosions: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Accessibility ===
    /// Reduced motion (minimize shake and flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Visual effects - all on by default
            screen_shake: true,
            explosions: true,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,

            // Accessibility
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Master volume as the 0-100 percent shown on the pause menu slider
    pub fn volume_percent(&self) -> u8 {
        (self.master_volume.clamp(0.0, 1.0) * 100.0) as u8
    }

    /// Set master volume from a 0-100 slider percent
    pub fn set_volume_percent(&mut self, percent: u8) {
        self.master_volume = f32::from(percent.min(100)) / 100.0;
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings: {e}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to save settings: {e}");
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.screen_shake);
        assert!(!settings.reduced_motion);
        assert_eq!(settings.volume_percent(), 80);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_volume_percent_round_trip() {
        let mut settings = Settings::default();
        settings.set_volume_percent(35);
        assert!((settings.master_volume - 0.35).abs() < 1e-6);
        assert_eq!(settings.volume_percent(), 35);
        settings.set_volume_percent(200);
        assert_eq!(settings.volume_percent(), 100);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.screen_shake = false;
        settings.master_volume = 0.25;
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(!back.screen_shake);
        assert!((back.master_volume - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/definitely/not/a/real/settings.json"));
        assert_eq!(settings.volume_percent(), 80);
    }
}
