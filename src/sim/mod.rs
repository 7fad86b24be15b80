//! Deterministic simulation module
//!
//! All flight logic lives here. This module must stay pure:
//! - One `tick` call per driver frame, no internal timers
//! - Same inputs and deltas always give the same flight
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod forces;
pub mod outcome;
pub mod runner;
pub mod sequencer;
pub mod state;
pub mod telemetry;
pub mod throttle;
pub mod tick;
pub mod trigger;

pub use autopilot::{Autopilot, Pilot};
pub use forces::{Regime, atmospheric_density, compute_acceleration, descent_rate_factor};
pub use outcome::{Outcome, PendingOutcome};
pub use runner::{FlightLog, PhaseEvent, fly};
pub use sequencer::{MissionClock, advance_phase};
pub use state::{Flight, FlightOptions, InitialConditions, PauseReason, SimulationState};
pub use telemetry::{NextPhase, Telemetry};
pub use throttle::{ThrottleBindings, ThrottleCommand, ThrottleUpdate, update_throttle};
pub use tick::{TickInput, TickReport, tick};
pub use trigger::{compute_progress, resolve_trigger, should_advance};
