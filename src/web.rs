//! Browser bindings
//!
//! The page owns the animation loop, the scene and the DOM. It forwards key
//! events here, calls `tick` once per `requestAnimationFrame` and renders the
//! returned telemetry JSON.

use wasm_bindgen::prelude::*;

use crate::catalog::ProfileCatalog;
use crate::profile::SpacecraftProfile;
use crate::settings::{Difficulty, Settings};
use crate::sim::{Flight, PendingOutcome, TickInput, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger was already initialized".into());
    }
    log::info!("Mars Lander (web) starting...");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One run driven from JavaScript
#[wasm_bindgen]
pub struct WebFlight {
    flight: Flight,
    input: TickInput,
    settings: Settings,
    pending: Option<PendingOutcome>,
}

impl WebFlight {
    fn begin(profile: SpacecraftProfile, settings: Settings) -> Result<WebFlight, JsValue> {
        let flight = Flight::new(profile, settings.flight_options()).map_err(js_error)?;
        Ok(WebFlight {
            flight,
            input: TickInput::default(),
            settings,
            pending: None,
        })
    }
}

#[wasm_bindgen]
impl WebFlight {
    /// Start a run from a profile JSON document and a difficulty name
    #[wasm_bindgen(constructor)]
    pub fn new(profile_json: &str, difficulty: &str) -> Result<WebFlight, JsValue> {
        let difficulty = Difficulty::from_str(difficulty)
            .ok_or_else(|| js_error(format!("unknown difficulty '{difficulty}'")))?;
        let mut settings = Settings::load();
        settings.difficulty = difficulty;
        let profile = SpacecraftProfile::from_json(profile_json).map_err(js_error)?;
        Self::begin(profile, settings)
    }

    /// Start a run from the stored settings and the built-in catalog
    #[wasm_bindgen(js_name = fromSettings)]
    pub fn from_settings() -> Result<WebFlight, JsValue> {
        let settings = Settings::load();
        let catalog = ProfileCatalog::builtin().map_err(js_error)?;
        let profile = if settings.uses_custom_profile() {
            let custom = &settings.custom;
            catalog
                .custom(&custom.name, custom.mass, custom.landing_method)
                .map_err(js_error)?
        } else {
            catalog
                .require(&settings.selected_profile)
                .map_err(js_error)?
                .clone()
        };
        Self::begin(profile, settings)
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) {
        if key == self.settings.half_throttle_key && !self.input.is_held(key) {
            self.input.half_throttle = true;
        }
        self.input.press(key);
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, key: &str) {
        self.input.release(key);
    }

    /// Release everything, e.g. when the page loses focus
    #[wasm_bindgen(js_name = releaseAll)]
    pub fn release_all(&mut self) {
        self.input.keys_down.clear();
    }

    #[wasm_bindgen(js_name = halfThrottle)]
    pub fn half_throttle(&mut self) {
        self.input.half_throttle = true;
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    /// Advance by the frame delta (seconds) and return telemetry JSON
    pub fn tick(&mut self, dt: f64) -> Result<String, JsValue> {
        let report = tick(&mut self.flight, &mut self.input, dt);
        if let Some(outcome) = report.outcome {
            self.pending = Some(PendingOutcome::new(outcome, self.settings.outcome_delay));
        }
        serde_json::to_string(&report.telemetry).map_err(js_error)
    }

    /// Outcome JSON once the post-touchdown delay has elapsed, exactly once
    #[wasm_bindgen(js_name = pollOutcome)]
    pub fn poll_outcome(&mut self, dt: f64) -> Option<String> {
        let outcome = self.pending.as_mut()?.poll(dt)?;
        serde_json::to_string(&outcome).ok()
    }

    /// End-screen message, available once the run has terminated
    #[wasm_bindgen(js_name = outcomeSummary)]
    pub fn outcome_summary(&self) -> Option<String> {
        self.flight.outcome().map(|o| o.summary())
    }

    #[wasm_bindgen(js_name = isTerminated)]
    pub fn is_terminated(&self) -> bool {
        self.flight.is_terminated()
    }
}
