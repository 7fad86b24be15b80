//! Per-tick telemetry snapshot handed to the presentation layer

use serde::Serialize;

use crate::profile::TriggerSpec;

use super::state::Flight;

/// Upcoming phase as seen by the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPhase {
    pub name: String,
    /// Trigger resolved for the run's autonomy level
    pub trigger: TriggerSpec,
    /// The operator has to press this phase's key. Whether the run waits
    /// frozen meanwhile shows in `Telemetry::paused`.
    pub awaiting_input: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub phase_index: usize,
    pub phase_name: String,
    pub phase_key: String,
    pub elapsed_time: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub throttle: f64,
    pub fuel_remaining: f64,
    pub effective_mass: f64,
    pub progress_to_next_phase: f64,
    pub paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_phase: Option<NextPhase>,
}

impl Telemetry {
    pub fn capture(flight: &Flight) -> Self {
        let state = &flight.state;
        let level = flight.options.autonomy;
        let phase = flight.current_phase();

        let next_phase = flight.next_phase().map(|next| {
            let trigger = next.trigger_for(level).clone();
            NextPhase {
                name: next.name.clone(),
                awaiting_input: trigger.is_key(),
                trigger,
            }
        });

        Self {
            phase_index: state.phase_index,
            phase_name: phase.name.clone(),
            phase_key: phase.key.as_str().to_string(),
            elapsed_time: state.elapsed_time(),
            altitude: state.altitude,
            velocity: state.velocity,
            acceleration: state.acceleration,
            throttle: state.throttle,
            fuel_remaining: state.fuel_remaining,
            effective_mass: state.effective_mass,
            progress_to_next_phase: state.progress,
            paused: state.is_paused(),
            guidance: phase.description_for(level).map(str::to_string),
            next_phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MSL_ID, ProfileCatalog};
    use crate::profile::AutonomyLevel;
    use crate::sim::state::FlightOptions;

    fn msl(autonomy: AutonomyLevel) -> Flight {
        let catalog = ProfileCatalog::builtin().unwrap();
        let profile = catalog.require(MSL_ID).unwrap().clone();
        Flight::new(
            profile,
            FlightOptions {
                autonomy,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_capture_initial_flight() {
        let t = Telemetry::capture(&msl(AutonomyLevel::Full));
        assert_eq!(t.phase_index, 0);
        assert_eq!(t.phase_key, "pre-entry");
        assert_eq!(t.altitude, 131_000.0);
        assert_eq!(t.fuel_remaining, 100.0);
        assert!(!t.paused);
        let next = t.next_phase.unwrap();
        assert_eq!(next.trigger, TriggerSpec::Altitude(125_000.0));
        assert!(!next.awaiting_input);
    }

    #[test]
    fn test_key_phase_awaits_input_while_free_running() {
        let mut flight = msl(AutonomyLevel::Guided);
        // Entry is flying; the parachute waits for its key
        flight.state.phase_index = 1;
        let t = Telemetry::capture(&flight);
        assert!(!t.paused);
        let next = t.next_phase.unwrap();
        assert_eq!(next.trigger, TriggerSpec::Key("p".into()));
        assert!(next.awaiting_input);

        flight.options.autonomy = AutonomyLevel::Unguided;
        let next = Telemetry::capture(&flight).next_phase.unwrap();
        assert_eq!(next.trigger, TriggerSpec::Velocity(450.0));
        assert!(!next.awaiting_input);
    }

    #[test]
    fn test_guidance_hidden_without_autonomy() {
        assert!(Telemetry::capture(&msl(AutonomyLevel::Full)).guidance.is_some());
        assert!(Telemetry::capture(&msl(AutonomyLevel::Unguided)).guidance.is_none());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(Telemetry::capture(&msl(AutonomyLevel::Full))).unwrap();
        for field in [
            "phaseIndex",
            "phaseName",
            "elapsedTime",
            "altitude",
            "velocity",
            "acceleration",
            "throttle",
            "fuelRemaining",
            "progressToNextPhase",
            "paused",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["nextPhase"]["trigger"]["type"], "altitude");
    }
}
