//! Variable timestep simulation tick
//!
//! One call per driver frame: integrate motion, evaluate forces, run the
//! phase sequencer, update the engine, detect touchdown and report.

use std::collections::HashSet;

use crate::profile::PhaseKey;

use super::forces::{Regime, compute_acceleration, descent_rate_factor};
use super::outcome::Outcome;
use super::sequencer::step_sequence;
use super::state::Flight;
use super::telemetry::Telemetry;
use super::throttle::{ThrottleCommand, update_throttle};

/// Input snapshot for a single tick
///
/// `keys_down` is level-triggered and persists between ticks; `half_throttle`
/// and `pause` are one-shot events that `tick` clears.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Currently held input symbols
    pub keys_down: HashSet<String>,
    /// Jump to half throttle (edge)
    pub half_throttle: bool,
    /// Operator pause toggle (edge)
    pub pause: bool,
}

impl TickInput {
    pub fn press(&mut self, key: &str) {
        self.keys_down.insert(key.to_string());
    }

    pub fn release(&mut self, key: &str) {
        self.keys_down.remove(key);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }
}

/// What one tick produced
#[derive(Debug, Clone)]
pub struct TickReport {
    pub telemetry: Telemetry,
    /// Present only on the tick that touched down
    pub outcome: Option<Outcome>,
}

/// Advance the flight by `dt` seconds
pub fn tick(flight: &mut Flight, input: &mut TickInput, dt: f64) -> TickReport {
    let toggle_pause = std::mem::take(&mut input.pause);
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

    // Terminated runs are frozen
    if flight.state.terminated {
        input.half_throttle = false;
        return TickReport {
            telemetry: Telemetry::capture(flight),
            outcome: None,
        };
    }

    if toggle_pause {
        flight.state.toggle_operator_pause();
    }

    let key = flight.current_phase().key.clone();

    if !flight.state.is_paused() {
        let corridor = descent_rate_factor(&key, &flight.profile);
        let state = &mut flight.state;
        state.clock.advance(dt);
        state.velocity += state.acceleration * dt;
        state.altitude -= state.velocity * dt * corridor;
    }

    flight.state.effective_mass = match Regime::for_key(&key) {
        Regime::PoweredLanding => flight.profile.dry_mass() + flight.state.fuel_remaining,
        _ => flight.profile.mass,
    };
    flight.state.acceleration = compute_acceleration(&key, &flight.state, &flight.profile);

    flight.state.progress = step_sequence(flight, input);

    if flight.current_phase().key == PhaseKey::Landing && !flight.state.is_paused() {
        let command = ThrottleCommand::sample(input, &flight.options.throttle_keys);
        let update = update_throttle(&command, &flight.state, &flight.profile, dt);
        let state = &mut flight.state;
        state.throttle = update.throttle;
        state.fuel_remaining = update.fuel_remaining;
        state.effective_mass = update.effective_mass;
    }
    input.half_throttle = false;

    let mut outcome = None;
    if flight.state.altitude <= 0.0 {
        let state = &mut flight.state;
        let result = Outcome::from_impact(state.velocity);
        state.altitude = 0.0;
        state.terminated = true;
        state.outcome = Some(result);
        log::info!(
            "Touchdown at T+{:.1}s: {} m/s, {}",
            state.elapsed_time(),
            result.impact_velocity,
            if result.success { "landed" } else { "crashed" }
        );
        outcome = Some(result);
    }

    TickReport {
        telemetry: Telemetry::capture(flight),
        outcome,
    }
}
