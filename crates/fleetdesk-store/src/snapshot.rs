use crate::store::FleetStore;
use crate::StoreError;
use chrono::{DateTime, Utc};
use fleetdesk_schema::{
    Driver, FuelLog, IncidentReport, MaintenanceSchedule, Message, Trip, User, Vehicle,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Serializable image of a whole session.
///
/// Exporting and re-importing a snapshot carries a session across runs; it
/// is not a durable store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FleetSnapshot {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub sequence: u64,
    pub vehicles: Vec<Vehicle>,
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub users: Vec<User>,
    pub trips: Vec<Trip>,
    #[serde(default)]
    pub fuel_logs: Vec<FuelLog>,
    #[serde(default)]
    pub incident_reports: Vec<IncidentReport>,
    #[serde(default)]
    pub schedules: Vec<MaintenanceSchedule>,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// blake3 checksum of the snapshot content. `None` for hand-written files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl FleetSnapshot {
    /// Compute the checksum over the content (excluding the checksum field itself).
    fn compute_checksum(&self) -> Result<String, StoreError> {
        let mut copy = self.clone();
        copy.checksum = None;
        let json = serde_json::to_string_pretty(&copy)?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }

    /// Serialize with an embedded checksum.
    pub fn to_json(&self) -> Result<String, StoreError> {
        let mut sealed = self.clone();
        sealed.checksum = Some(sealed.compute_checksum()?);
        Ok(serde_json::to_string_pretty(&sealed)?)
    }

    pub fn from_json(content: &str) -> Result<Self, StoreError> {
        let snapshot: FleetSnapshot = serde_json::from_str(content)?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: SNAPSHOT_FORMAT_VERSION,
                found: snapshot.format_version,
            });
        }
        if let Some(ref expected) = snapshot.checksum {
            let actual = snapshot.compute_checksum()?;
            if actual != *expected {
                return Err(StoreError::IntegrityFailure {
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        Ok(snapshot)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let content = self.to_json()?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        debug!("wrote snapshot to {}", path.display());
        Ok(())
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl FleetStore {
    pub fn to_snapshot(&self, exported_at: DateTime<Utc>) -> FleetSnapshot {
        FleetSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            exported_at,
            sequence: self.sequence,
            vehicles: self.vehicles.values().cloned().collect(),
            drivers: self.drivers.values().cloned().collect(),
            users: self.users.values().cloned().collect(),
            trips: self.trips.clone(),
            fuel_logs: self.fuel_logs.clone(),
            incident_reports: self.incident_reports.clone(),
            schedules: self.schedules.clone(),
            messages: self.messages.clone(),
            checksum: None,
        }
    }

    /// Rebuild a store from a snapshot, rejecting duplicate ids and any
    /// lifecycle invariant violation.
    pub fn from_snapshot(snapshot: FleetSnapshot) -> Result<Self, StoreError> {
        let mut store = FleetStore::new();
        for vehicle in snapshot.vehicles {
            let id = vehicle.id.clone();
            if store.vehicles.insert(id.clone(), vehicle).is_some() {
                return Err(StoreError::DuplicateId {
                    kind: "vehicle",
                    id: id.into_inner(),
                });
            }
        }
        for driver in snapshot.drivers {
            store.add_driver(driver)?;
        }
        for user in snapshot.users {
            store.add_user(user)?;
        }
        for trip in snapshot.trips {
            if store.trips.iter().any(|t| t.id == trip.id) {
                return Err(StoreError::DuplicateId {
                    kind: "trip",
                    id: trip.id.into_inner(),
                });
            }
            store.trips.push(trip);
        }
        store.fuel_logs = snapshot.fuel_logs;
        store.incident_reports = snapshot.incident_reports;
        store.schedules = snapshot.schedules;
        store.schedules.sort_by(|a, b| a.date_time.cmp(&b.date_time));
        store.messages = snapshot.messages;
        store.sequence = snapshot.sequence;

        store.check_invariants()?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use fleetdesk_schema::VehicleStatus;

    fn exported_at() -> DateTime<Utc> {
        "2024-08-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn snapshot_roundtrip_preserves_store() {
        let store = seed::seeded();
        let json = store.to_snapshot(exported_at()).to_json().unwrap();
        let restored = FleetStore::from_snapshot(FleetSnapshot::from_json(&json).unwrap()).unwrap();
        assert_eq!(restored.vehicles().count(), 4);
        assert_eq!(restored.trips(), store.trips());
        assert_eq!(restored.summary(), store.summary());
    }

    #[test]
    fn to_json_embeds_checksum() {
        let json = seed::seeded().to_snapshot(exported_at()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["checksum"].as_str().is_some_and(|c| c.len() == 64));
    }

    #[test]
    fn tampered_snapshot_is_rejected() {
        let json = seed::seeded().to_snapshot(exported_at()).to_json().unwrap();
        let tampered = json.replace("130100", "999999");
        assert!(matches!(
            FleetSnapshot::from_json(&tampered),
            Err(StoreError::IntegrityFailure { .. })
        ));
    }

    #[test]
    fn snapshot_without_checksum_is_accepted() {
        let snapshot = seed::seeded().to_snapshot(exported_at());
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(FleetSnapshot::from_json(&json).is_ok());
    }

    #[test]
    fn wrong_format_version_is_rejected() {
        let mut snapshot = seed::seeded().to_snapshot(exported_at());
        snapshot.format_version = 99;
        let json = snapshot.to_json().unwrap();
        assert!(matches!(
            FleetSnapshot::from_json(&json),
            Err(StoreError::VersionMismatch { found: 99, .. })
        ));
    }

    #[test]
    fn inconsistent_snapshot_fails_import() {
        let mut snapshot = seed::seeded().to_snapshot(exported_at());
        if let Some(v) = snapshot.vehicles.iter_mut().find(|v| v.id == "TRK-001") {
            v.status = VehicleStatus::InUse;
        }
        assert!(matches!(
            FleetStore::from_snapshot(snapshot),
            Err(StoreError::InvariantViolation(_))
        ));
    }

    #[test]
    fn duplicate_vehicle_fails_import() {
        let mut snapshot = seed::seeded().to_snapshot(exported_at());
        let dup = snapshot.vehicles[0].clone();
        snapshot.vehicles.push(dup);
        assert!(matches!(
            FleetStore::from_snapshot(snapshot),
            Err(StoreError::DuplicateId { kind: "vehicle", .. })
        ));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let snapshot = seed::seeded().to_snapshot(exported_at());
        snapshot.write_to_file(&path).unwrap();
        let loaded = FleetSnapshot::read_from_file(&path).unwrap();
        assert_eq!(loaded.vehicles, snapshot.vehicles);
        assert!(loaded.checksum.is_some());
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FleetSnapshot::read_from_file(dir.path().join("nope.json")),
            Err(StoreError::Io(_))
        ));
    }
}
