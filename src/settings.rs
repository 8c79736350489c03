//! Game settings and preferences
//!
//! Persisted separately from the score list in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::persistence;

/// Quality preset levels - scales cosmetic backdrop detail
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

    /// Clouds painted into the backdrop
    pub fn cloud_count(&self) -> usize {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium => 5,
            QualityPreset::High => 9,
        }
    }

    /// Background trees along the grass line
    pub fn tree_count(&self) -> usize {
        match self {
            QualityPreset::Low => 2,
            QualityPreset::Medium => 4,
            QualityPreset::High => 6,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Backdrop quality preset
    pub quality: QualityPreset,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (skip the level-up banner animation)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            show_fps: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            mute_on_blur: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "basket_catcher_settings";

    /// Effective volume for sound effects
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Effective volume for background music
    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }

    /// Load settings from storage, defaulting on anything missing or bad
    pub fn load() -> Self {
        match persistence::get_item(Self::STORAGE_KEY) {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                log::warn!("Discarding malformed settings: {err}");
                Self::default()
            }),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to storage
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            persistence::set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_preset_scales_decoration() {
        assert!(QualityPreset::Low.cloud_count() < QualityPreset::High.cloud_count());
        assert!(QualityPreset::Low.tree_count() < QualityPreset::High.tree_count());
    }

    #[test]
    fn test_effective_volumes() {
        let mut settings = Settings::default();
        settings.master_volume = 0.5;
        settings.sfx_volume = 0.5;
        assert!((settings.effective_sfx_volume() - 0.25).abs() < 1e-6);

        settings.master_volume = 0.0;
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_settings_serde_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).expect("serialize");
        let back: Settings = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.quality, settings.quality);
        assert_eq!(back.mute_on_blur, settings.mute_on_blur);
    }
}
