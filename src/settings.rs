//! Cosmetic preferences
//!
//! Persisted in LocalStorage. Nothing here changes scoring or timing.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle burst on each hit
    pub feedback_bursts: bool,
    /// Pulse the score display on each hit
    pub score_pop: bool,
    /// Reduced motion (turns off bursts and pulses)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feedback_bursts: true,
            score_pop: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective feedback bursts (respects reduced_motion)
    pub fn effective_feedback_bursts(&self) -> bool {
        self.feedback_bursts && !self.reduced_motion
    }

    /// Effective score pulse (respects reduced_motion)
    pub fn effective_score_pop(&self) -> bool {
        self.score_pop && !self.reduced_motion
    }

    /// Flip reduced motion, returning the new value
    pub fn toggle_reduced_motion(&mut self) -> bool {
        self.reduced_motion = !self.reduced_motion;
        self.reduced_motion
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "reflex_dot_settings";

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
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
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
    fn test_reduced_motion_overrides() {
        let mut settings = Settings::default();
        assert!(settings.effective_feedback_bursts());
        assert!(settings.effective_score_pop());

        settings.reduced_motion = true;
        assert!(!settings.effective_feedback_bursts());
        assert!(!settings.effective_score_pop());
    }

    #[test]
    fn test_toggle_survives_storage_format() {
        let mut settings = Settings::default();
        assert!(settings.toggle_reduced_motion());

        let json = serde_json::to_string(&settings).unwrap();
        let restored: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, settings);
        assert!(!restored.effective_feedback_bursts());

        settings.toggle_reduced_motion();
        assert!(settings.effective_score_pop());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"score_pop":false}"#).unwrap();
        assert!(settings.feedback_bursts);
        assert!(!settings.score_pop);
        assert!(!settings.reduced_motion);
    }
}
