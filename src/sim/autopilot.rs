//! Pilots: anything that turns a flight into input for the next tick

use crate::profile::{PhaseKey, TriggerSpec};

use super::state::{Flight, PauseReason};
use super::tick::TickInput;
use super::trigger::should_advance;

/// Deceleration the landing guidance plans with (m/s²)
const APPROACH_DECELERATION: f64 = 1.2;
/// Floor of the landing velocity target (m/s)
const MIN_TARGET_SPEED: f64 = 2.0;

/// Source of operator input for a flight
pub trait Pilot {
    /// Fill `input` for the upcoming tick
    fn control(&mut self, flight: &Flight, input: &mut TickInput);

    /// Forget any per-run state
    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Flies any profile hands-off.
///
/// Key triggers are pressed when the phase's automatic (`full`) condition
/// would have fired, or straight away when the run is holding for them. The
/// powered landing tracks a stopping-distance velocity target.
#[derive(Debug, Default)]
pub struct Autopilot {
    pressed: Option<String>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descent speed that still stops by the surface at the planned deceleration
    pub fn target_speed(altitude: f64) -> f64 {
        (2.0 * APPROACH_DECELERATION * altitude.max(0.0))
            .sqrt()
            .max(MIN_TARGET_SPEED)
    }

    fn trigger_key(&mut self, flight: &Flight, input: &mut TickInput) {
        if let Some(key) = self.pressed.take() {
            input.release(&key);
        }
        let Some(next) = flight.next_phase() else {
            return;
        };
        let TriggerSpec::Key(key) = next.trigger_for(flight.options.autonomy) else {
            return;
        };

        let due = flight.state.pause == Some(PauseReason::AwaitingInput)
            || match &next.trigger.full {
                TriggerSpec::Key(_) => true,
                full => should_advance(full, &flight.state, input),
            };
        if due {
            log::debug!("{}: pressing {key} for {}", self.name(), next.name);
            input.press(key);
            self.pressed = Some(key.clone());
        }
    }

    fn throttle(&self, flight: &Flight, input: &mut TickInput) {
        let keys = &flight.options.throttle_keys;
        let powered = flight.current_phase().key == PhaseKey::Landing;
        let state = &flight.state;

        if powered && state.velocity > Self::target_speed(state.altitude) {
            input.press(&keys.increase);
            input.release(&keys.decrease);
        } else if powered {
            input.release(&keys.increase);
            input.press(&keys.decrease);
        } else {
            input.release(&keys.increase);
            input.release(&keys.decrease);
        }
    }
}

impl Pilot for Autopilot {
    fn control(&mut self, flight: &Flight, input: &mut TickInput) {
        self.trigger_key(flight, input);
        self.throttle(flight, input);
    }

    fn reset(&mut self) {
        self.pressed = None;
    }

    fn name(&self) -> &str {
        "autopilot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tests::{phase, profile};
    use crate::profile::TriggerTable;
    use crate::sim::state::{FlightOptions, InitialConditions};
    use crate::profile::AutonomyLevel;

    fn guided(altitude: f64, pausing: bool) -> Flight {
        let mut sequence = vec![
            phase("entry", TriggerSpec::Altitude(1_000_000.0)),
            phase("parachute-deploy", TriggerSpec::Altitude(5_000.0)),
        ];
        sequence[1].trigger = TriggerTable {
            full: TriggerSpec::Altitude(5_000.0),
            guided: Some(TriggerSpec::Key("p".into())),
            unguided: None,
        };
        let options = FlightOptions {
            autonomy: AutonomyLevel::Guided,
            pausing,
            initial: InitialConditions {
                altitude,
                velocity: 100.0,
            },
            ..Default::default()
        };
        Flight::new(profile(sequence), options).unwrap()
    }

    #[test]
    fn test_target_speed() {
        assert_eq!(Autopilot::target_speed(0.0), MIN_TARGET_SPEED);
        assert!((Autopilot::target_speed(1_000.0) - 2_400.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_waits_for_full_condition() {
        let mut pilot = Autopilot::new();
        let mut input = TickInput::default();

        pilot.control(&guided(8_000.0, false), &mut input);
        assert!(!input.is_held("p"));

        pilot.control(&guided(4_000.0, false), &mut input);
        assert!(input.is_held("p"));

        pilot.control(&guided(8_000.0, false), &mut input);
        assert!(!input.is_held("p"));
    }

    #[test]
    fn test_answers_input_hold_immediately() {
        let mut flight = guided(8_000.0, true);
        flight.state.hold(PauseReason::AwaitingInput);
        let mut input = TickInput::default();
        Autopilot::new().control(&flight, &mut input);
        assert!(input.is_held("p"));
    }

    #[test]
    fn test_landing_throttle_tracks_target() {
        let sequence = vec![
            phase("backshell-separation", TriggerSpec::Altitude(1_000_000.0)),
            phase("landing", TriggerSpec::Altitude(2_000.0)),
        ];
        let mut flight = Flight::new(profile(sequence), FlightOptions::default()).unwrap();
        flight.state.phase_index = 1;
        flight.state.altitude = 1_000.0;
        let mut pilot = Autopilot::new();
        let mut input = TickInput::default();

        flight.state.velocity = 80.0;
        pilot.control(&flight, &mut input);
        assert!(input.is_held("Shift") && !input.is_held("Control"));

        flight.state.velocity = 20.0;
        pilot.control(&flight, &mut input);
        assert!(input.is_held("Control") && !input.is_held("Shift"));
    }
}
