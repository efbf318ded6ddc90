//! Visual settings and preferences
//!
//! Persisted in LocalStorage on the web. Nothing here affects scoring or the
//! win condition, only how much eye candy the frame loop produces.

use serde::{Deserialize, Serialize};

use crate::consts::STAR_COUNT;

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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 150,
            QualityPreset::Medium => 600,
            QualityPreset::High => 2000,
        }
    }

    /// Fraction of the full star field to scatter
    pub fn star_density(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Camera shake on explosions
    pub screen_shake: bool,
    /// Projectile light trails
    pub trails: bool,
    /// Explosion and firework particles
    pub particles: bool,
    /// Category labels under the invaders
    pub labels: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            trails: true,
            particles: true,
            labels: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset skips trails; they are a poly-line with glow per projectile
        if preset == QualityPreset::Low {
            self.trails = false;
        }
    }

    /// Flip a named toggle; `false` if the name is unknown
    pub fn set_option(&mut self, name: &str, on: bool) -> bool {
        let flag = match name.to_lowercase().as_str() {
            "shake" | "screen_shake" => &mut self.screen_shake,
            "trails" => &mut self.trails,
            "particles" => &mut self.particles,
            "labels" => &mut self.labels,
            "reduced_motion" => &mut self.reduced_motion,
            _ => return false,
        };
        *flag = on;
        true
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Stars to scatter in the background
    pub fn star_count(&self) -> usize {
        (STAR_COUNT as f32 * self.quality.star_density()).round() as usize
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "love_invaders_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_screen_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn particles_toggle_zeroes_cap() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 2000);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn low_preset_thins_stars_and_trails() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.trails);
        assert_eq!(settings.star_count(), 50);
        assert_eq!(Settings::default().star_count(), STAR_COUNT);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"quality":"Low"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.screen_shake);
        assert!(settings.labels);
    }

    #[test]
    fn options_toggle_by_name() {
        let mut settings = Settings::default();
        assert!(settings.set_option("Labels", false));
        assert!(!settings.labels);
        assert!(settings.set_option("reduced_motion", true));
        assert!(!settings.effective_screen_shake());
        assert!(!settings.set_option("bloom", true));
        assert_eq!(
            Settings {
                labels: true,
                reduced_motion: false,
                ..settings
            },
            Settings::default()
        );
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
