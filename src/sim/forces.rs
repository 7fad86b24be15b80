//! Force model
//!
//! One scalar acceleration per tick, chosen by the regime of the current
//! phase. Positive values speed up the descent.

use crate::consts::{GRAVITY, MAX_THRUST_GRAVITIES, SCALE_HEIGHT, SURFACE_DENSITY};
use crate::profile::{PhaseKey, SpacecraftProfile};

use super::state::SimulationState;

/// Force-model branch selected by a phase key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Gravity only
    FreeFall,
    /// Gravity against aerodynamic drag
    AtmosphericDrag,
    /// Constant net acceleration under canopy
    Parachute,
    /// Gravity against throttled engine thrust
    PoweredLanding,
}

impl Regime {
    pub fn for_key(key: &PhaseKey) -> Self {
        match key {
            PhaseKey::Entry | PhaseKey::DescentPreParachute | PhaseKey::ParachuteDeploy => {
                Regime::AtmosphericDrag
            }
            PhaseKey::DescentParachute => Regime::Parachute,
            PhaseKey::Landing => Regime::PoweredLanding,
            PhaseKey::Cruise
            | PhaseKey::PreEntry
            | PhaseKey::AeroshellJettison
            | PhaseKey::BackshellSeparation
            | PhaseKey::FinalDescent
            | PhaseKey::Touchdown
            | PhaseKey::Other(_) => Regime::FreeFall,
        }
    }
}

/// Exponential atmosphere density (kg/m³)
#[inline]
pub fn atmospheric_density(altitude: f64) -> f64 {
    SURFACE_DENSITY * (-altitude / SCALE_HEIGHT).exp()
}

/// Drag deceleration (m/s²) at the given altitude and speed
pub fn drag_acceleration(altitude: f64, velocity: f64, mass: f64, area: f64) -> f64 {
    let drag_force = 0.5 * atmospheric_density(altitude) * velocity * velocity * area;
    drag_force / mass
}

/// Net acceleration for the regime of `key`
pub fn compute_acceleration(key: &PhaseKey, state: &SimulationState, profile: &SpacecraftProfile) -> f64 {
    match Regime::for_key(key) {
        Regime::FreeFall => GRAVITY,
        Regime::AtmosphericDrag => {
            GRAVITY
                - drag_acceleration(
                    state.altitude,
                    state.velocity,
                    state.effective_mass,
                    profile.cross_section_area,
                )
        }
        Regime::Parachute => profile.parachute_deceleration,
        Regime::PoweredLanding => GRAVITY - state.throttle * MAX_THRUST_GRAVITIES * GRAVITY,
    }
}

/// Fraction of the descent speed that turns into lost altitude
pub fn descent_rate_factor(key: &PhaseKey, profile: &SpacecraftProfile) -> f64 {
    if key.in_entry_corridor() {
        profile.entry_flight_path_angle.to_radians().sin()
    } else {
        1.0
    }
}
