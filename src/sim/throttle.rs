//! Throttle and fuel controller for the powered landing

use serde::{Deserialize, Serialize};

use crate::consts::{FUEL_CAPACITY, THROTTLE_STEP};
use crate::profile::SpacecraftProfile;

use super::state::SimulationState;
use super::tick::TickInput;

/// Held keys that ramp the throttle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleBindings {
    pub increase: String,
    pub decrease: String,
}

impl Default for ThrottleBindings {
    fn default() -> Self {
        Self {
            increase: "Shift".to_string(),
            decrease: "Control".to_string(),
        }
    }
}

/// Operator intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThrottleCommand {
    pub increase: bool,
    pub decrease: bool,
    /// One-shot: jump straight to half throttle
    pub half: bool,
}

impl ThrottleCommand {
    /// Read the command from the input snapshot, consuming the half-throttle edge
    pub fn sample(input: &mut TickInput, bindings: &ThrottleBindings) -> Self {
        Self {
            increase: input.is_held(&bindings.increase),
            decrease: input.is_held(&bindings.decrease),
            half: std::mem::take(&mut input.half_throttle),
        }
    }
}

/// New engine values after one controller step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrottleUpdate {
    pub throttle: f64,
    pub fuel_remaining: f64,
    pub effective_mass: f64,
}

/// Burn-rate multiplier; running above half throttle costs extra
#[inline]
fn burn_factor(throttle: f64) -> f64 {
    if throttle > 0.5 { 1.5 } else { 1.0 }
}

/// Apply the command, burn fuel for `dt` and recompute the vehicle mass
pub fn update_throttle(
    command: &ThrottleCommand,
    state: &SimulationState,
    profile: &SpacecraftProfile,
    dt: f64,
) -> ThrottleUpdate {
    let mut throttle = state.throttle;
    let mut fuel = state.fuel_remaining;

    if fuel <= 0.0 {
        throttle = 0.0;
        fuel = 0.0;
    } else {
        if command.increase {
            throttle = (throttle + THROTTLE_STEP).min(1.0);
        }
        if command.decrease {
            throttle = (throttle - THROTTLE_STEP).max(0.0);
        }
        if command.half {
            throttle = 0.5;
        }

        fuel -= throttle * dt * burn_factor(throttle);
        if fuel <= 0.0 {
            log::warn!("Landing fuel exhausted");
            fuel = 0.0;
            throttle = 0.0;
        }
    }

    ThrottleUpdate {
        throttle,
        fuel_remaining: fuel.min(FUEL_CAPACITY),
        effective_mass: profile.dry_mass() + fuel,
    }
}
