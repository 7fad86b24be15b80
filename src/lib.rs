//! Mars Lander - entry, descent and landing simulation
//!
//! Core modules:
//! - `sim`: Deterministic tick-driven flight (phase sequencer, forces, throttle, outcome)
//! - `profile`: Spacecraft profiles and their phase timeline
//! - `catalog`: Built-in and on-disk profile collections
//! - `settings`: Player preferences and difficulty mapping
//! - `web`: Browser bindings (wasm32 only)

pub mod catalog;
pub mod error;
pub mod profile;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::ProfileCatalog;
pub use error::{LanderError, Result};
pub use profile::{AutonomyLevel, Phase, PhaseKey, SpacecraftProfile, TriggerSpec};
pub use settings::{Difficulty, Settings};

/// Simulation constants for the simulated body and vehicle
pub mod consts {
    /// Mars surface gravity (m/s²)
    pub const GRAVITY: f64 = 3.721;

    /// Altitude at the start of a run (m)
    pub const STARTING_ALTITUDE: f64 = 131_000.0;
    /// Descent speed at the start of a run (m/s)
    pub const ENTRY_VELOCITY: f64 = 5588.0;
    /// Default entry flight path angle (degrees)
    pub const DEFAULT_FLIGHT_PATH_ANGLE: f64 = 68.0;

    /// Surface density of the exponential atmosphere (kg/m³)
    pub const SURFACE_DENSITY: f64 = 0.02;
    /// Atmospheric scale height (m)
    pub const SCALE_HEIGHT: f64 = 11_100.0;

    /// Fully loaded fuel, in both percent and mass units
    pub const FUEL_CAPACITY: f64 = 100.0;
    /// Throttle change per tick while an increase/decrease key is held
    pub const THROTTLE_STEP: f64 = 0.01;
    /// Engine thrust at full throttle, in multiples of GRAVITY
    pub const MAX_THRUST_GRAVITIES: f64 = 1.5;

    /// Highest impact speed that still counts as a landing (m/s)
    pub const SAFE_LANDING_VELOCITY: f64 = 10.0;
    /// Delay before the outcome is handed to the results layer (s)
    pub const OUTCOME_DELAY: f64 = 3.0;

    /// Nominal frame delta for headless runs (60 Hz)
    pub const FRAME_DT: f64 = 1.0 / 60.0;
}
