//! Headless flight runner

use serde::Serialize;

use crate::consts::FRAME_DT;

use super::autopilot::Pilot;
use super::outcome::Outcome;
use super::state::Flight;
use super::telemetry::Telemetry;
use super::tick::{TickInput, tick};

/// A phase transition observed during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseEvent {
    pub time: f64,
    pub phase_index: usize,
    pub phase_name: String,
    pub altitude: f64,
    pub velocity: f64,
}

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct FlightLog {
    pub trace: Vec<Telemetry>,
    pub events: Vec<PhaseEvent>,
    /// None when the time budget ran out before touchdown
    pub outcome: Option<Outcome>,
    pub ticks: usize,
}

/// Tick `flight` under `pilot` until touchdown or `max_time` driver seconds
pub fn fly(flight: &mut Flight, pilot: &mut dyn Pilot, dt: f64, max_time: f64) -> FlightLog {
    let dt = if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        log::warn!("Unusable timestep {dt}, falling back to {FRAME_DT}");
        FRAME_DT
    };
    let max_ticks = (max_time.max(0.0) / dt).ceil() as usize;

    let mut log = FlightLog::default();
    let mut input = TickInput::default();
    let mut phase_index = flight.state.phase_index;
    pilot.reset();
    log::info!(
        "Flying {} with {} at dt={:.4}s (budget {:.0}s)",
        flight.profile.name,
        pilot.name(),
        dt,
        max_time
    );

    while log.ticks < max_ticks {
        pilot.control(flight, &mut input);
        let report = tick(flight, &mut input, dt);
        log.ticks += 1;

        let telemetry = report.telemetry;
        if telemetry.phase_index != phase_index {
            phase_index = telemetry.phase_index;
            log.events.push(PhaseEvent {
                time: telemetry.elapsed_time,
                phase_index,
                phase_name: telemetry.phase_name.clone(),
                altitude: telemetry.altitude,
                velocity: telemetry.velocity,
            });
        }
        log.trace.push(telemetry);

        if let Some(outcome) = report.outcome {
            log.outcome = Some(outcome);
            break;
        }
    }

    if log.outcome.is_none() {
        log::warn!(
            "No touchdown after {} ticks ({:.0} m, {:.1} m/s)",
            log.ticks,
            flight.state.altitude,
            flight.state.velocity
        );
    }
    log
}
