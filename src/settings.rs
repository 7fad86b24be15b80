//! Player settings and preferences
//!
//! Persisted as JSON: a file on native builds, LocalStorage in the browser.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::MSL_ID;
use crate::consts::OUTCOME_DELAY;
use crate::error::{LanderError, Result};
use crate::profile::{AutonomyLevel, LandingMethod};
use crate::sim::{FlightOptions, InitialConditions, ThrottleBindings};

/// Difficulty levels offered on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// Guided triggers, and the clock stops while a key trigger is pending
    Easy,
    /// Guided triggers, free-running clock
    #[default]
    Medium,
    /// No guidance text; a key trigger inherited from `full` still freezes the run
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "full" => Some(Difficulty::Easy),
            "medium" | "med" | "guided" => Some(Difficulty::Medium),
            "hard" | "none" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn autonomy(&self) -> AutonomyLevel {
        match self {
            Difficulty::Easy | Difficulty::Medium => AutonomyLevel::Guided,
            Difficulty::Hard => AutonomyLevel::Unguided,
        }
    }

    /// Whether a pending key trigger freezes the run. Only Medium free-runs.
    pub fn pausing(&self) -> bool {
        !matches!(self, Difficulty::Medium)
    }
}

/// A player-designed spacecraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSpacecraft {
    pub name: String,
    /// Total mass including fuel (kg)
    pub mass: f64,
    pub landing_method: LandingMethod,
}

impl Default for CustomSpacecraft {
    fn default() -> Self {
        Self {
            name: "Custom Lander".to_string(),
            mass: 900.0,
            landing_method: LandingMethod::Propulsion,
        }
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Catalog id of the selected profile, or "custom"
    pub selected_profile: String,
    pub custom: CustomSpacecraft,

    // === Flight ===
    /// Seconds between touchdown and the results screen
    pub outcome_delay: f64,
    pub throttle_keys: ThrottleBindings,
    /// Key that fires the one-shot half-throttle command
    pub half_throttle_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            selected_profile: MSL_ID.to_string(),
            custom: CustomSpacecraft::default(),
            outcome_delay: OUTCOME_DELAY,
            throttle_keys: ThrottleBindings::default(),
            half_throttle_key: "e".to_string(),
        }
    }
}

impl Settings {
    /// Create settings for a difficulty level
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn uses_custom_profile(&self) -> bool {
        self.selected_profile == "custom"
    }

    /// Core configuration for a run under these settings
    pub fn flight_options(&self) -> FlightOptions {
        FlightOptions {
            autonomy: self.difficulty.autonomy(),
            pausing: self.difficulty.pausing(),
            throttle_keys: self.throttle_keys.clone(),
            initial: InitialConditions::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(LanderError::Settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(LanderError::Settings)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| LanderError::io(path, e))?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| LanderError::io(path, e))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "mars_lander_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
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
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_mapping() {
        assert_eq!(Difficulty::Easy.autonomy(), AutonomyLevel::Guided);
        assert!(Difficulty::Easy.pausing());
        assert_eq!(Difficulty::Medium.autonomy(), AutonomyLevel::Guided);
        assert!(!Difficulty::Medium.pausing());
        assert_eq!(Difficulty::Hard.autonomy(), AutonomyLevel::Unguided);
        assert!(Difficulty::Hard.pausing());
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("none"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("insane"), None);
    }

    #[test]
    fn test_flight_options_follow_difficulty() {
        let options = Settings::from_difficulty(Difficulty::Easy).flight_options();
        assert_eq!(options.autonomy, AutonomyLevel::Guided);
        assert!(options.pausing);
        assert_eq!(options.throttle_keys.increase, "Shift");
    }

    #[test]
    fn test_hard_holds_on_inherited_key_trigger() {
        use crate::profile::TriggerSpec;
        use crate::profile::tests::{phase, profile};
        use crate::sim::{Flight, PauseReason, TickInput, tick};

        let p = profile(vec![
            phase("cruise", TriggerSpec::Altitude(1_000_000.0)),
            phase("entry", TriggerSpec::Key("s".into())),
        ]);
        let options = Settings::from_difficulty(Difficulty::Hard).flight_options();
        let mut flight = Flight::new(p.clone(), options).unwrap();
        let report = tick(&mut flight, &mut TickInput::default(), 0.1);
        assert!(report.telemetry.paused);
        assert_eq!(flight.state().pause, Some(PauseReason::AwaitingInput));
        assert!(report.telemetry.guidance.is_none());

        let options = Settings::from_difficulty(Difficulty::Medium).flight_options();
        let mut flight = Flight::new(p, options).unwrap();
        assert!(!tick(&mut flight, &mut TickInput::default(), 0.1).telemetry.paused);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = Settings::from_json(r#"{"difficulty": "Hard"}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.selected_profile, MSL_ID);
        assert_eq!(settings.outcome_delay, OUTCOME_DELAY);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::from_difficulty(Difficulty::Easy);
        settings.selected_profile = "custom".to_string();
        settings.custom.mass = 1100.0;
        settings.custom.landing_method = LandingMethod::Airbag;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        assert!(loaded.uses_custom_profile());
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(LanderError::Settings(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        assert_eq!(
            Settings::load_or_default(&dir.path().join("absent.json")),
            Settings::default()
        );
    }
}
