//! Flight state and core simulation types
//!
//! One `Flight` per run: the validated profile, the run options and the
//! mutable `SimulationState` that only the tick function writes.

use serde::{Deserialize, Serialize};

use crate::consts::{ENTRY_VELOCITY, FUEL_CAPACITY, GRAVITY, STARTING_ALTITUDE};
use crate::error::{LanderError, Result};
use crate::profile::{AutonomyLevel, Phase, SpacecraftProfile};

use super::outcome::Outcome;
use super::sequencer::MissionClock;
use super::throttle::ThrottleBindings;

/// Why the run is currently frozen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseReason {
    /// Pausing policy is on and the next phase waits for a key
    AwaitingInput,
    /// The operator toggled pause
    Operator,
}

/// Altitude and descent speed at the first tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub altitude: f64,
    pub velocity: f64,
}

impl InitialConditions {
    /// Both values must be finite, or touchdown can never be detected
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("altitude", self.altitude), ("velocity", self.velocity)] {
            if !value.is_finite() {
                return Err(LanderError::InvalidOptions(format!(
                    "initial {field} is not finite ({value})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            altitude: STARTING_ALTITUDE,
            velocity: ENTRY_VELOCITY,
        }
    }
}

/// Per-run configuration of the sequencer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOptions {
    pub autonomy: AutonomyLevel,
    /// Freeze the run while a key trigger is pending
    pub pausing: bool,
    pub throttle_keys: ThrottleBindings,
    pub initial: InitialConditions,
}

impl Default for FlightOptions {
    fn default() -> Self {
        Self {
            autonomy: AutonomyLevel::Full,
            pausing: false,
            throttle_keys: ThrottleBindings::default(),
            initial: InitialConditions::default(),
        }
    }
}

/// Mutable state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Index into the profile sequence; never decreases
    pub phase_index: usize,
    pub clock: MissionClock,
    /// Height above the surface (m)
    pub altitude: f64,
    /// Descent speed (m/s, positive = downward)
    pub velocity: f64,
    /// Net acceleration from the last force evaluation (m/s²)
    pub acceleration: f64,
    /// Engine command in [0, 1]
    pub throttle: f64,
    /// Landing fuel in [0, 100]
    pub fuel_remaining: f64,
    /// Mass used by the force model (kg)
    pub effective_mass: f64,
    /// Approach-to-threshold indicator for the next phase; not clamped
    pub progress: f64,
    pub pause: Option<PauseReason>,
    /// Set once altitude reaches zero; the run is frozen afterwards
    pub terminated: bool,
    pub outcome: Option<Outcome>,
}

impl SimulationState {
    pub fn new(profile: &SpacecraftProfile, initial: &InitialConditions) -> Self {
        Self {
            phase_index: 0,
            clock: MissionClock::default(),
            altitude: initial.altitude,
            velocity: initial.velocity,
            acceleration: GRAVITY,
            throttle: 0.0,
            fuel_remaining: FUEL_CAPACITY,
            effective_mass: profile.mass,
            progress: 0.0,
            pause: None,
            terminated: false,
            outcome: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_some()
    }

    /// Mission elapsed time (s), excluding paused stretches
    pub fn elapsed_time(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Freeze the run, banking the clock
    pub fn hold(&mut self, reason: PauseReason) {
        if self.pause.is_none() {
            self.clock.bank();
        }
        self.pause = Some(reason);
    }

    pub fn release(&mut self) {
        self.pause = None;
    }

    /// Pause-toggle input. A pending key trigger cannot be toggled away.
    pub fn toggle_operator_pause(&mut self) {
        match self.pause {
            None => {
                self.hold(PauseReason::Operator);
                log::debug!("Paused by operator at T+{:.1}s", self.elapsed_time());
            }
            Some(PauseReason::Operator) => {
                self.release();
                log::debug!("Resumed by operator");
            }
            Some(PauseReason::AwaitingInput) => {}
        }
    }
}

/// A single run: profile, options and state.
///
/// Only the tick function writes the state, which keeps the phase index
/// inside the sequence.
#[derive(Debug, Clone)]
pub struct Flight {
    pub(crate) profile: SpacecraftProfile,
    pub(crate) options: FlightOptions,
    pub(crate) state: SimulationState,
}

impl Flight {
    /// Validate the profile and starting conditions and start a fresh run
    pub fn new(profile: SpacecraftProfile, options: FlightOptions) -> Result<Self> {
        profile.validate()?;
        options.initial.validate()?;
        let state = SimulationState::new(&profile, &options.initial);
        log::info!(
            "New flight: {} ({} phases, autonomy {}, pausing {})",
            profile.name,
            profile.sequence.len(),
            options.autonomy.as_str(),
            options.pausing
        );
        Ok(Self {
            profile,
            options,
            state,
        })
    }

    /// Phase currently being flown
    pub fn current_phase(&self) -> &Phase {
        // phase_index only moves through `sequencer::advance_phase`, which
        // refuses to leave the sequence
        &self.profile.sequence[self.state.phase_index]
    }

    pub fn profile(&self) -> &SpacecraftProfile {
        &self.profile
    }

    pub fn options(&self) -> &FlightOptions {
        &self.options
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn next_phase(&self) -> Option<&Phase> {
        self.profile.sequence.get(self.state.phase_index + 1)
    }

    pub fn phase(&self, index: usize) -> Result<&Phase> {
        self.profile.phase(index)
    }

    pub fn is_terminated(&self) -> bool {
        self.state.terminated
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }
}
