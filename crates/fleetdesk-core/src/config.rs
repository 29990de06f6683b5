use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CHECKOUT_ORIGIN: &str = "Garagem";

pub const DEFAULT_CHECKLIST: [&str; 8] = [
    "Documentos em ordem (CNH, CRLV)",
    "Nível de combustível verificado",
    "Pneus em bom estado e calibrados",
    "Faróis e lanternas funcionando",
    "Espelhos ajustados e limpos",
    "Cintos de segurança funcionando",
    "Água do limpador de parabrisa",
    "Veículo limpo e organizado",
];

/// What check-in and handover acceptance do when the vehicle has no open trip.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingTripPolicy {
    /// Reject the command with `NoActiveTrip`.
    #[default]
    Fail,
    /// Update the vehicle anyway and log a warning.
    Proceed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Origin stamped on checkout trips. `None` uses the vehicle's location.
    pub checkout_origin: Option<String>,
    pub missing_trip_policy: MissingTripPolicy,
    pub require_checklist: bool,
    pub checklist: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            checkout_origin: Some(DEFAULT_CHECKOUT_ORIGIN.to_owned()),
            missing_trip_policy: MissingTripPolicy::Fail,
            require_checklist: true,
            checklist: DEFAULT_CHECKLIST.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

impl EngineConfig {
    /// Load config from `~/.config/fleetdesk/config.json`, or the defaults
    /// when that file does not exist.
    pub fn load_default() -> Result<Self, CoreError> {
        let path = default_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CoreError::Config(format!("invalid config {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    #[must_use]
    pub fn with_missing_trip_policy(mut self, policy: MissingTripPolicy) -> Self {
        self.missing_trip_policy = policy;
        self
    }

    #[must_use]
    pub fn without_checklist(mut self) -> Self {
        self.require_checklist = false;
        self
    }
}

pub fn default_config_path() -> Result<PathBuf, CoreError> {
    let home = std::env::var("HOME").map_err(|_| CoreError::Config("HOME not set".to_owned()))?;
    Ok(PathBuf::from(home).join(".config/fleetdesk/config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.checkout_origin.as_deref(), Some("Garagem"));
        assert_eq!(config.missing_trip_policy, MissingTripPolicy::Fail);
        assert!(config.require_checklist);
        assert_eq!(config.checklist.len(), 8);
    }

    #[test]
    fn config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.json");

        let config = EngineConfig::default()
            .with_missing_trip_policy(MissingTripPolicy::Proceed)
            .without_checklist();
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "missing_trip_policy": "proceed" }"#).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded.missing_trip_policy, MissingTripPolicy::Proceed);
        assert_eq!(loaded.checkout_origin.as_deref(), Some("Garagem"));
        assert_eq!(loaded.checklist.len(), 8);
    }

    #[test]
    fn null_origin_means_vehicle_location() {
        let loaded: EngineConfig = serde_json::from_str(r#"{ "checkout_origin": null }"#).unwrap();
        assert!(loaded.checkout_origin.is_none());
    }

    #[test]
    fn invalid_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(CoreError::Config(_))
        ));
    }
}
