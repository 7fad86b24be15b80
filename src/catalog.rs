//! Profile collections
//!
//! Profiles live as one JSON document per file; the file stem becomes the
//! profile id. Two profiles ship embedded in the crate.

use std::fs;
use std::path::Path;

use crate::error::{LanderError, Result};
use crate::profile::{LandingMethod, SpacecraftProfile};

/// Id of the built-in powered-landing profile
pub const MSL_ID: &str = "nasa-msl";
/// Id of the built-in airbag-landing profile
pub const MER_ID: &str = "nasa-mer";

const BUILTIN: [(&str, &str); 2] = [
    (MSL_ID, include_str!("../assets/profiles/nasa-msl.json")),
    (MER_ID, include_str!("../assets/profiles/nasa-mer.json")),
];

/// An ordered set of validated profiles
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: Vec<SpacecraftProfile>,
}

impl ProfileCatalog {
    /// Profiles embedded in the crate
    pub fn builtin() -> Result<Self> {
        let profiles = BUILTIN
            .iter()
            .map(|(id, json)| parse_with_id(id, json))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { profiles })
    }

    /// Load every `*.json` profile in a directory, sorted by file name
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| LanderError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| LanderError::io(dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut profiles = Vec::with_capacity(paths.len());
        for path in paths {
            let json = fs::read_to_string(&path).map_err(|e| LanderError::io(&path, e))?;
            let id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let profile = parse_with_id(&id, &json).map_err(|e| match e {
                LanderError::InvalidProfile(msg) => {
                    LanderError::InvalidProfile(format!("{}: {msg}", path.display()))
                }
                other => other,
            })?;
            profiles.push(profile);
        }

        log::info!("Loaded {} profiles from {}", profiles.len(), dir.display());
        Ok(Self { profiles })
    }

    pub fn get(&self, id: &str) -> Option<&SpacecraftProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&SpacecraftProfile> {
        self.get(id)
            .ok_or_else(|| LanderError::UnknownProfile(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpacecraftProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Player-designed spacecraft built on the matching reference mission
    pub fn custom(&self, name: &str, mass: f64, method: LandingMethod) -> Result<SpacecraftProfile> {
        let base_id = match method {
            LandingMethod::Propulsion => MSL_ID,
            LandingMethod::Airbag => MER_ID,
        };
        let profile = self.require(base_id)?.customized(name, mass)?;
        log::info!(
            "Custom spacecraft '{}' ({} kg, {}) based on {}",
            profile.name,
            profile.mass,
            method.as_str(),
            base_id
        );
        Ok(profile)
    }
}

fn parse_with_id(id: &str, json: &str) -> Result<SpacecraftProfile> {
    let mut profile = SpacecraftProfile::from_json(json)?;
    profile.id = id.to_string();
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PhaseKey;

    #[test]
    fn test_builtin_profiles_are_valid() {
        let catalog = ProfileCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 2);

        let msl = catalog.get(MSL_ID).unwrap();
        assert_eq!(msl.name, "NASA MSL");
        assert!(msl.has_powered_landing());

        let mer = catalog.get(MER_ID).unwrap();
        assert!(!mer.has_powered_landing());
        assert_eq!(mer.sequence.last().unwrap().key, PhaseKey::FinalDescent);
    }

    #[test]
    fn test_unknown_profile() {
        let catalog = ProfileCatalog::builtin().unwrap();
        assert!(matches!(
            catalog.require("viking"),
            Err(LanderError::UnknownProfile(_))
        ));
    }

    #[test]
    fn test_custom_profile_follows_landing_method() {
        let catalog = ProfileCatalog::builtin().unwrap();

        let powered = catalog.custom("Red Rover", 1000.0, LandingMethod::Propulsion).unwrap();
        assert!(powered.is_custom);
        assert_eq!(powered.mass, 1000.0);
        assert!(powered.has_powered_landing());

        let bouncy = catalog.custom("Beach Ball", 400.0, LandingMethod::Airbag).unwrap();
        assert!(!bouncy.has_powered_landing());
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        for (id, json) in BUILTIN {
            fs::write(dir.path().join(format!("{id}.json")), json).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "not a profile").unwrap();

        let catalog = ProfileCatalog::load_dir(dir.path()).unwrap();
        let ids: Vec<_> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![MER_ID, MSL_ID]);
    }

    #[test]
    fn test_load_dir_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{\"name\": \"Broken\"}").unwrap();

        let err = ProfileCatalog::load_dir(dir.path()).unwrap_err();
        match err {
            LanderError::InvalidProfile(msg) => assert!(msg.contains("broken.json"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_dir() {
        let err = ProfileCatalog::load_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, LanderError::Io { .. }));
    }
}
