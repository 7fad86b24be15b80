//! Landing outcome and its delayed hand-off to the results layer

use serde::{Deserialize, Serialize};

use crate::consts::SAFE_LANDING_VELOCITY;

/// Result of a run, produced exactly once at touchdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub success: bool,
    /// Impact speed rounded down (m/s)
    pub impact_velocity: f64,
}

impl Outcome {
    pub fn from_impact(velocity: f64) -> Self {
        Self {
            success: velocity <= SAFE_LANDING_VELOCITY,
            impact_velocity: velocity.floor(),
        }
    }

    /// End-screen message
    pub fn summary(&self) -> String {
        if self.success {
            format!(
                "The spacecraft successfully touched down on the surface of Mars at {} m/s, congratulations!",
                self.impact_velocity
            )
        } else {
            format!(
                "The spacecraft crashed on the surface of Mars at {} m/s and suffered a rapid unscheduled disassembly.",
                self.impact_velocity
            )
        }
    }
}

/// Outcome waiting out the touchdown delay.
///
/// The driver feeds it its own frame deltas, so the owning layer decides
/// when the results view appears; nothing here runs a timer.
#[derive(Debug, Clone)]
pub struct PendingOutcome {
    outcome: Outcome,
    remaining: f64,
    delivered: bool,
}

impl PendingOutcome {
    pub fn new(outcome: Outcome, delay: f64) -> Self {
        Self {
            outcome,
            remaining: delay.max(0.0),
            delivered: false,
        }
    }

    /// Count down by `dt`; yields the outcome once when the delay has passed
    pub fn poll(&mut self, dt: f64) -> Option<Outcome> {
        if self.delivered {
            return None;
        }
        self.remaining -= dt.max(0.0);
        if self.remaining <= 0.0 {
            self.delivered = true;
            Some(self.outcome)
        } else {
            None
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_threshold() {
        assert_eq!(
            Outcome::from_impact(15.0),
            Outcome {
                success: false,
                impact_velocity: 15.0
            }
        );
        assert_eq!(
            Outcome::from_impact(3.0),
            Outcome {
                success: true,
                impact_velocity: 3.0
            }
        );
        assert!(Outcome::from_impact(10.0).success);
        let near = Outcome::from_impact(10.4);
        assert!(!near.success);
        assert_eq!(near.impact_velocity, 10.0);
    }

    #[test]
    fn test_summary() {
        assert!(Outcome::from_impact(2.5).summary().contains("touched down"));
        assert!(Outcome::from_impact(80.0).summary().contains("80 m/s"));
    }

    #[test]
    fn test_pending_outcome_delivers_once() {
        let mut pending = PendingOutcome::new(Outcome::from_impact(4.0), 3.0);
        assert_eq!(pending.poll(1.0), None);
        assert_eq!(pending.poll(1.5), None);
        assert_eq!(pending.poll(0.6), Some(Outcome::from_impact(4.0)));
        assert!(pending.is_delivered());
        assert_eq!(pending.poll(1.0), None);
    }

    #[test]
    fn test_zero_delay_is_immediate() {
        let mut pending = PendingOutcome::new(Outcome::from_impact(40.0), 0.0);
        assert!(pending.poll(0.0).is_some());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Outcome::from_impact(15.2)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["impactVelocity"], 15.0);
    }
}
