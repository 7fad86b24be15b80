//! Phase sequencer
//!
//! Moves the flight through its timeline, at most one phase per tick, and
//! owns the pause-for-input policy and the mission clock.

use serde::{Deserialize, Serialize};

use crate::error::{LanderError, Result};

use super::state::{Flight, PauseReason, SimulationState};
use super::tick::TickInput;
use super::trigger::{compute_progress, resolve_trigger, should_advance};

/// Mission clock that only runs while the flight is unpaused.
///
/// Pausing banks the running segment so resuming carries on from the
/// cumulative total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionClock {
    banked: f64,
    running: f64,
}

impl MissionClock {
    pub fn advance(&mut self, dt: f64) {
        self.running += dt;
    }

    /// Close the running segment
    pub fn bank(&mut self) {
        self.banked += self.running;
        self.running = 0.0;
    }

    pub fn elapsed(&self) -> f64 {
        self.banked + self.running
    }
}

/// Step to the next phase
pub fn advance_phase(state: &mut SimulationState, len: usize) -> Result<()> {
    let next = state.phase_index + 1;
    if next >= len {
        return Err(LanderError::PhaseIndexOutOfRange { index: next, len });
    }
    state.phase_index = next;
    Ok(())
}

/// Evaluate the next phase's trigger and advance at most once.
///
/// Returns the progress indicator toward that trigger (0 on the last phase).
pub fn step_sequence(flight: &mut Flight, input: &TickInput) -> f64 {
    let Flight {
        profile,
        options,
        state,
    } = flight;

    let Some(next) = profile.sequence.get(state.phase_index + 1) else {
        return 0.0;
    };
    let trigger = resolve_trigger(next, options.autonomy);
    let progress = compute_progress(trigger, state, input);

    if should_advance(trigger, state, input) {
        match advance_phase(state, profile.sequence.len()) {
            Ok(()) => {
                log::info!(
                    "T+{:.1}s entered phase {} '{}' ({}) at {:.0} m, {:.1} m/s",
                    state.elapsed_time(),
                    state.phase_index,
                    next.name,
                    trigger,
                    state.altitude,
                    state.velocity
                );
                if state.pause == Some(PauseReason::AwaitingInput) {
                    state.release();
                }
            }
            Err(e) => log::error!("{e}"),
        }
    } else if trigger.is_key() && options.pausing && !state.is_paused() {
        log::debug!("Holding for input: {} ({})", next.name, trigger);
        state.hold(PauseReason::AwaitingInput);
    }

    progress
}
