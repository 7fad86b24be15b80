//! Trigger evaluation

use crate::profile::{AutonomyLevel, Phase, TriggerSpec};

use super::state::SimulationState;
use super::tick::TickInput;

/// Trigger for `phase` at this autonomy level, falling back to `full`
pub fn resolve_trigger(phase: &Phase, level: AutonomyLevel) -> &TriggerSpec {
    phase.trigger_for(level)
}

pub fn should_advance(trigger: &TriggerSpec, state: &SimulationState, input: &TickInput) -> bool {
    match trigger {
        TriggerSpec::Altitude(threshold) => state.altitude < *threshold,
        TriggerSpec::Velocity(threshold) => state.velocity < *threshold,
        TriggerSpec::Key(key) => input.is_held(key),
    }
}

/// Threshold-over-current ratio for the progress bar.
///
/// Deliberately unclamped: it exceeds 1 once the threshold is crossed and
/// diverges as the measured value approaches zero.
pub fn compute_progress(trigger: &TriggerSpec, state: &SimulationState, input: &TickInput) -> f64 {
    match trigger {
        TriggerSpec::Altitude(threshold) => threshold / state.altitude,
        TriggerSpec::Velocity(threshold) => threshold / state.velocity,
        TriggerSpec::Key(key) => {
            if input.is_held(key) {
                1.0
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tests::{phase, profile};
    use crate::profile::TriggerTable;
    use crate::sim::state::InitialConditions;

    fn state(altitude: f64, velocity: f64) -> SimulationState {
        let p = profile(vec![
            phase("cruise", TriggerSpec::Altitude(1.0)),
            phase("cruise", TriggerSpec::Altitude(1.0)),
        ]);
        SimulationState::new(&p, &InitialConditions { altitude, velocity })
    }

    #[test]
    fn test_threshold_triggers_are_strict() {
        let s = state(100.0, 50.0);
        let input = TickInput::default();
        assert!(!should_advance(&TriggerSpec::Altitude(100.0), &s, &input));
        assert!(should_advance(&TriggerSpec::Altitude(100.1), &s, &input));
        assert!(!should_advance(&TriggerSpec::Velocity(50.0), &s, &input));
        assert!(should_advance(&TriggerSpec::Velocity(51.0), &s, &input));
    }

    #[test]
    fn test_key_trigger_follows_held_keys() {
        let s = state(100.0, 50.0);
        let trigger = TriggerSpec::Key("p".into());
        let mut input = TickInput::default();
        assert!(!should_advance(&trigger, &s, &input));
        assert_eq!(compute_progress(&trigger, &s, &input), 0.0);

        input.press("p");
        assert!(should_advance(&trigger, &s, &input));
        assert_eq!(compute_progress(&trigger, &s, &input), 1.0);

        input.release("p");
        assert!(!should_advance(&trigger, &s, &input));
    }

    #[test]
    fn test_progress_is_unclamped() {
        let input = TickInput::default();
        assert_eq!(compute_progress(&TriggerSpec::Altitude(1_000.0), &state(4_000.0, 1.0), &input), 0.25);
        assert_eq!(compute_progress(&TriggerSpec::Altitude(1_000.0), &state(500.0, 1.0), &input), 2.0);

        let slow = state(1.0, 0.001);
        assert!(compute_progress(&TriggerSpec::Velocity(100.0), &slow, &input) > 1_000.0);
        let climbing = state(1.0, -5.0);
        assert!(compute_progress(&TriggerSpec::Velocity(100.0), &climbing, &input) < 0.0);
    }

    #[test]
    fn test_resolution_falls_back_to_full() {
        let mut p = phase("parachute-deploy", TriggerSpec::Velocity(450.0));
        assert_eq!(resolve_trigger(&p, AutonomyLevel::Guided), &TriggerSpec::Velocity(450.0));

        p.trigger = TriggerTable {
            full: TriggerSpec::Velocity(450.0),
            guided: Some(TriggerSpec::Key("p".into())),
            unguided: None,
        };
        assert_eq!(resolve_trigger(&p, AutonomyLevel::Guided), &TriggerSpec::Key("p".into()));
        assert_eq!(resolve_trigger(&p, AutonomyLevel::Unguided), &TriggerSpec::Velocity(450.0));
        assert_eq!(resolve_trigger(&p, AutonomyLevel::Full), &TriggerSpec::Velocity(450.0));
    }
}
