//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web, defaulted on native.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset in the Low -> Medium -> High cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum particles drawn per frame for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 400,
            QualityPreset::High => 1024,
        }
    }

    /// Whether to draw the background star field
    pub fn starfield_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }

    /// Whether power-ups and the ship get a soft glow halo
    pub fn glow_enabled(&self) -> bool {
        *self == QualityPreset::High
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle effects (explosions, pickups, level-up ring)
    pub particles: bool,
    /// Scrolling star background
    pub starfield: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no pulsing, spinning or banner scaling)
    pub reduced_motion: bool,
    /// High contrast palette
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            starfield: true,
            show_fps: false,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.starfield = preset.starfield_enabled();
    }

    /// Effective particle draw cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective star field toggle
    pub fn draw_starfield(&self) -> bool {
        self.starfield && self.quality.starfield_enabled()
    }

    /// Whether cosmetic animation (spin, pulse) should play
    pub fn animate(&self) -> bool {
        !self.reduced_motion
    }

    /// Parse stored JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Ignoring stored settings: {}", err);
                Self::default()
            }
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "star_blaster_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match local_storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            Some(json) => {
                log::info!("Loaded settings from LocalStorage");
                Self::from_json(&json)
            }
            None => {
                log::info!("No stored settings, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = local_storage() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write settings");
                }
            }
            Err(err) => log::warn!("Failed to serialize settings: {}", err),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_cycle() {
        let mut preset = QualityPreset::Low;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(preset.as_str());
            preset = preset.next();
        }
        assert_eq!(seen, ["Low", "Medium", "High"]);
        assert_eq!(preset, QualityPreset::Low);
    }

    #[test]
    fn test_apply_preset_restores_starfield() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        assert!(!settings.draw_starfield());
        settings.apply_preset(settings.quality.next());
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.draw_starfield());
    }

    #[test]
    fn test_low_preset_hides_starfield() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        assert!(!settings.draw_starfield());
        assert_eq!(settings.max_particles(), 100);
    }

    #[test]
    fn test_particles_toggle() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_json_roundtrip_and_fallback() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);

        // Missing fields take defaults, garbage falls back entirely
        assert!(Settings::from_json(r#"{ "high_contrast": true }"#).high_contrast);
        assert_eq!(Settings::from_json("{{nope"), Settings::default());
    }
}
