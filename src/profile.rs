//! Spacecraft profiles and the phase timeline they carry
//!
//! A profile is static data: it is validated once when a run is created and
//! never mutated by the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FLIGHT_PATH_ANGLE, FUEL_CAPACITY};
use crate::error::{LanderError, Result};

/// How much guidance the operator gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AutonomyLevel {
    #[default]
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "guided")]
    Guided,
    /// No guidance text; triggers still fall back to `full`
    #[serde(rename = "none")]
    Unguided,
}

impl AutonomyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutonomyLevel::Full => "full",
            AutonomyLevel::Guided => "guided",
            AutonomyLevel::Unguided => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(AutonomyLevel::Full),
            "guided" => Some(AutonomyLevel::Guided),
            "none" | "unguided" => Some(AutonomyLevel::Unguided),
            _ => None,
        }
    }

    /// Whether descriptive guidance text is exposed at this level
    pub fn shows_guidance(&self) -> bool {
        *self != AutonomyLevel::Unguided
    }
}

/// Identifier selecting a phase's force regime.
///
/// Unknown keys are kept verbatim in `Other` and fly under free fall.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PhaseKey {
    Cruise,
    PreEntry,
    Entry,
    AeroshellJettison,
    DescentPreParachute,
    ParachuteDeploy,
    DescentParachute,
    BackshellSeparation,
    Landing,
    FinalDescent,
    Touchdown,
    Other(String),
}

impl PhaseKey {
    pub fn as_str(&self) -> &str {
        match self {
            PhaseKey::Cruise => "cruise",
            PhaseKey::PreEntry => "pre-entry",
            PhaseKey::Entry => "entry",
            PhaseKey::AeroshellJettison => "aeroshell-jettison",
            PhaseKey::DescentPreParachute => "descent-pre-parachute",
            PhaseKey::ParachuteDeploy => "parachute-deploy",
            PhaseKey::DescentParachute => "descent-parachute",
            PhaseKey::BackshellSeparation => "backshell-separation",
            PhaseKey::Landing => "landing",
            PhaseKey::FinalDescent => "final-descent",
            PhaseKey::Touchdown => "touchdown",
            PhaseKey::Other(key) => key,
        }
    }

    /// Phases flown along the inclined entry corridor rather than straight down
    pub fn in_entry_corridor(&self) -> bool {
        matches!(
            self,
            PhaseKey::PreEntry
                | PhaseKey::Entry
                | PhaseKey::AeroshellJettison
                | PhaseKey::DescentPreParachute
                | PhaseKey::ParachuteDeploy
        )
    }
}

impl From<String> for PhaseKey {
    fn from(key: String) -> Self {
        match key.as_str() {
            "cruise" => PhaseKey::Cruise,
            "pre-entry" => PhaseKey::PreEntry,
            "entry" => PhaseKey::Entry,
            "aeroshell-jettison" => PhaseKey::AeroshellJettison,
            "descent-pre-parachute" => PhaseKey::DescentPreParachute,
            "parachute-deploy" => PhaseKey::ParachuteDeploy,
            "descent-parachute" => PhaseKey::DescentParachute,
            "backshell-separation" => PhaseKey::BackshellSeparation,
            "landing" => PhaseKey::Landing,
            // Older profiles spell it "decent"
            "final-descent" | "final-decent" => PhaseKey::FinalDescent,
            "touchdown" => PhaseKey::Touchdown,
            _ => PhaseKey::Other(key),
        }
    }
}

impl From<PhaseKey> for String {
    fn from(key: PhaseKey) -> Self {
        match key {
            PhaseKey::Other(key) => key,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PhaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition that advances the sequencer into a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TriggerSpec {
    /// Fires once altitude drops below the threshold (m)
    Altitude(f64),
    /// Fires once descent speed drops below the threshold (m/s)
    Velocity(f64),
    /// Fires while the named input symbol is held
    Key(String),
}

impl TriggerSpec {
    pub fn is_key(&self) -> bool {
        matches!(self, TriggerSpec::Key(_))
    }
}

impl fmt::Display for TriggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerSpec::Altitude(value) => write!(f, "altitude < {value} m"),
            TriggerSpec::Velocity(value) => write!(f, "velocity < {value} m/s"),
            TriggerSpec::Key(key) => write!(f, "key {key}"),
        }
    }
}

/// Per-autonomy-level triggers. `full` is mandatory and is the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerTable {
    pub full: TriggerSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guided: Option<TriggerSpec>,
    #[serde(default, rename = "none", skip_serializing_if = "Option::is_none")]
    pub unguided: Option<TriggerSpec>,
}

impl TriggerTable {
    /// Trigger for the level, falling back to `full`
    pub fn resolve(&self, level: AutonomyLevel) -> &TriggerSpec {
        let specific = match level {
            AutonomyLevel::Full => None,
            AutonomyLevel::Guided => self.guided.as_ref(),
            AutonomyLevel::Unguided => self.unguided.as_ref(),
        };
        specific.unwrap_or(&self.full)
    }

    fn entries(&self) -> impl Iterator<Item = &TriggerSpec> {
        std::iter::once(&self.full)
            .chain(self.guided.as_ref())
            .chain(self.unguided.as_ref())
    }
}

/// Per-autonomy-level guidance text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guided: Option<String>,
    #[serde(default, rename = "none", skip_serializing_if = "Option::is_none")]
    pub unguided: Option<String>,
}

/// One stage of the flight timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub key: PhaseKey,
    pub name: String,
    #[serde(default)]
    pub description: Descriptions,
    pub trigger: TriggerTable,
}

impl Phase {
    pub fn trigger_for(&self, level: AutonomyLevel) -> &TriggerSpec {
        self.trigger.resolve(level)
    }

    /// Guidance text shown while this phase is active. Suppressed entirely
    /// at the unguided level.
    pub fn description_for(&self, level: AutonomyLevel) -> Option<&str> {
        if !level.shows_guidance() {
            return None;
        }
        let text = match level {
            AutonomyLevel::Guided => self.description.guided.as_ref(),
            AutonomyLevel::Full | AutonomyLevel::Unguided => self.description.full.as_ref(),
        };
        text.or(self.description.full.as_ref()).map(String::as_str)
    }
}

/// How a custom spacecraft gets down the last few metres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandingMethod {
    #[default]
    Propulsion,
    Airbag,
}

impl LandingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandingMethod::Propulsion => "propulsion",
            LandingMethod::Airbag => "airbag",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "propulsion" | "powered" => Some(LandingMethod::Propulsion),
            "airbag" | "airbags" => Some(LandingMethod::Airbag),
            _ => None,
        }
    }
}

fn default_flight_path_angle() -> f64 {
    DEFAULT_FLIGHT_PATH_ANGLE
}

/// Static vehicle configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacecraftProfile {
    /// Catalog id (file stem); not part of the profile document
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base mass including a full fuel load (kg)
    pub mass: f64,
    /// Aerodynamic reference area (m²)
    pub cross_section_area: f64,
    /// Net acceleration under canopy (m/s², negative slows the descent)
    pub parachute_deceleration: f64,
    /// Entry corridor inclination (degrees)
    #[serde(default = "default_flight_path_angle")]
    pub entry_flight_path_angle: f64,
    /// Flight timeline; order is load-bearing
    pub sequence: Vec<Phase>,
    /// Presentation-only model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

impl SpacecraftProfile {
    /// Parse and validate a profile document
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: SpacecraftProfile = serde_json::from_str(json)
            .map_err(|e| LanderError::InvalidProfile(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| LanderError::InvalidProfile(e.to_string()))
    }

    /// Dry mass used while flying on the landing engine
    pub fn dry_mass(&self) -> f64 {
        self.mass - FUEL_CAPACITY
    }

    pub fn has_powered_landing(&self) -> bool {
        self.sequence.iter().any(|p| p.key == PhaseKey::Landing)
    }

    pub fn phase(&self, index: usize) -> Result<&Phase> {
        self.sequence
            .get(index)
            .ok_or(LanderError::PhaseIndexOutOfRange {
                index,
                len: self.sequence.len(),
            })
    }

    /// Reject profiles the sequencer cannot fly
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(LanderError::InvalidProfile(msg));

        if self.sequence.len() < 2 {
            return invalid(format!(
                "'{}' needs at least 2 phases, found {}",
                self.name,
                self.sequence.len()
            ));
        }

        for (field, value) in [
            ("mass", self.mass),
            ("crossSectionArea", self.cross_section_area),
            ("parachuteDeceleration", self.parachute_deceleration),
            ("entryFlightPathAngle", self.entry_flight_path_angle),
        ] {
            if !value.is_finite() {
                return invalid(format!("'{}': {field} is not finite", self.name));
            }
        }
        if self.mass <= 0.0 {
            return invalid(format!("'{}': mass must be positive", self.name));
        }
        if self.cross_section_area < 0.0 {
            return invalid(format!("'{}': crossSectionArea is negative", self.name));
        }
        if self.has_powered_landing() && self.dry_mass() <= 0.0 {
            return invalid(format!(
                "'{}': mass {} leaves no dry mass after {FUEL_CAPACITY} fuel",
                self.name, self.mass
            ));
        }

        for phase in &self.sequence {
            for trigger in phase.trigger.entries() {
                match trigger {
                    TriggerSpec::Altitude(v) | TriggerSpec::Velocity(v) if !v.is_finite() => {
                        return invalid(format!(
                            "phase '{}': trigger threshold is not finite",
                            phase.name
                        ));
                    }
                    TriggerSpec::Key(k) if k.is_empty() => {
                        return invalid(format!("phase '{}': empty trigger key", phase.name));
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Copy of this profile renamed and re-massed for a player design
    pub fn customized(&self, name: &str, mass: f64) -> Result<Self> {
        let mut profile = self.clone();
        profile.id = "custom".to_string();
        profile.name = name.to_string();
        profile.mass = mass;
        profile.is_custom = true;
        profile.validate()?;
        Ok(profile)
    }
}
