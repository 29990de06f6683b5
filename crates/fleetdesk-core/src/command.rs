//! The closed set of driver actions accepted by the engine.

use crate::CoreError;
use fleetdesk_schema::{DriverId, FuelLevel, VehicleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Command {
    CheckOut {
        vehicle: VehicleId,
        driver: DriverId,
        start_mileage: u64,
        start_fuel_level: FuelLevel,
        destination: String,
        purpose: String,
    },
    CheckIn {
        vehicle: VehicleId,
        end_mileage: u64,
        end_fuel_level: FuelLevel,
    },
    InitiateHandover {
        vehicle: VehicleId,
        target_driver: DriverId,
        justification: String,
    },
    AcceptHandover {
        vehicle: VehicleId,
        start_mileage: u64,
        start_fuel_level: FuelLevel,
        destination: String,
        purpose: String,
    },
    RejectHandover {
        vehicle: VehicleId,
    },
    TogglePause {
        vehicle: VehicleId,
    },
}

impl Command {
    pub fn vehicle(&self) -> &VehicleId {
        match self {
            Command::CheckOut { vehicle, .. }
            | Command::CheckIn { vehicle, .. }
            | Command::InitiateHandover { vehicle, .. }
            | Command::AcceptHandover { vehicle, .. }
            | Command::RejectHandover { vehicle }
            | Command::TogglePause { vehicle } => vehicle,
        }
    }

    /// Kebab-case action name, as used in scripts.
    pub fn action(&self) -> &'static str {
        match self {
            Command::CheckOut { .. } => "check-out",
            Command::CheckIn { .. } => "check-in",
            Command::InitiateHandover { .. } => "initiate-handover",
            Command::AcceptHandover { .. } => "accept-handover",
            Command::RejectHandover { .. } => "reject-handover",
            Command::TogglePause { .. } => "toggle-pause",
        }
    }

    /// Whether the driver must confirm the safety checklist first.
    pub fn needs_checklist(&self) -> bool {
        matches!(
            self,
            Command::CheckOut { .. } | Command::CheckIn { .. } | Command::AcceptHandover { .. }
        )
    }

    /// Reject commands with missing required fields before they reach the
    /// planner.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.vehicle().trim().is_empty() {
            return Err(CoreError::InvalidCommand(format!(
                "{}: vehicle id is empty",
                self.action()
            )));
        }
        match self {
            Command::CheckOut {
                driver,
                destination,
                purpose,
                ..
            } => {
                require("driver", driver, self.action())?;
                require("destination", destination, self.action())?;
                require("purpose", purpose, self.action())
            }
            Command::AcceptHandover {
                destination,
                purpose,
                ..
            } => {
                require("destination", destination, self.action())?;
                require("purpose", purpose, self.action())
            }
            Command::InitiateHandover {
                target_driver,
                justification,
                ..
            } => {
                require("target driver", target_driver, self.action())?;
                require("justification", justification, self.action())
            }
            Command::CheckIn { .. } | Command::RejectHandover { .. } | Command::TogglePause { .. } => {
                Ok(())
            }
        }
    }
}

fn require(field: &str, value: &str, action: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidCommand(format!("{action}: {field} is required")));
    }
    Ok(())
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action(), self.vehicle())
    }
}

/// Checklist items the driver has ticked before acting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistConfirmation {
    confirmed: BTreeSet<String>,
}

impl ChecklistConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every item of `items` confirmed.
    pub fn all<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            confirmed: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn confirm(&mut self, item: impl Into<String>) {
        self.confirmed.insert(item.into());
    }

    pub fn is_confirmed(&self, item: &str) -> bool {
        self.confirmed.contains(item)
    }

    /// Items of `required` that were not confirmed, in their given order.
    pub fn missing(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|item| !self.is_confirmed(item))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkout(destination: &str, purpose: &str) -> Command {
        Command::CheckOut {
            vehicle: VehicleId::new("CAR-001"),
            driver: DriverId::new("DRV-002"),
            start_mileage: 100_000,
            start_fuel_level: FuelLevel::Full,
            destination: destination.to_owned(),
            purpose: purpose.to_owned(),
        }
    }

    #[test]
    fn checkout_requires_destination_and_purpose() {
        assert!(checkout("SP", "delivery").validate().is_ok());
        let err = checkout("  ", "delivery").validate().unwrap_err();
        assert!(err.to_string().contains("destination is required"));
        assert!(checkout("SP", "").validate().is_err());
    }

    #[test]
    fn handover_requires_justification() {
        let cmd = Command::InitiateHandover {
            vehicle: VehicleId::new("CAR-001"),
            target_driver: DriverId::new("DRV-002"),
            justification: String::new(),
        };
        assert!(matches!(cmd.validate(), Err(CoreError::InvalidCommand(_))));
    }

    #[test]
    fn empty_vehicle_rejected() {
        let cmd = Command::TogglePause {
            vehicle: VehicleId::new(""),
        };
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn json_uses_action_tag() {
        let json = serde_json::to_value(checkout("SP", "delivery")).unwrap();
        assert_eq!(json["action"], "check-out");
        assert_eq!(json["vehicle"], "CAR-001");

        let parsed: Command =
            serde_json::from_str(r#"{"action":"reject-handover","vehicle":"VAN-001"}"#).unwrap();
        assert_eq!(
            parsed,
            Command::RejectHandover {
                vehicle: VehicleId::new("VAN-001")
            }
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        let parsed: Result<Command, _> =
            serde_json::from_str(r#"{"action":"teleport","vehicle":"VAN-001"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn checklist_gate() {
        assert!(checkout("SP", "x").needs_checklist());
        assert!(!Command::TogglePause {
            vehicle: VehicleId::new("CAR-001")
        }
        .needs_checklist());
    }

    #[test]
    fn checklist_missing_items() {
        let required = vec!["Pneus".to_owned(), "Freios".to_owned(), "Faróis".to_owned()];
        let mut confirmation = ChecklistConfirmation::new();
        confirmation.confirm("Freios");
        assert_eq!(confirmation.missing(&required), vec!["Pneus", "Faróis"]);
        assert!(ChecklistConfirmation::all(required.clone())
            .missing(&required)
            .is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(checkout("SP", "x").to_string(), "check-out CAR-001");
    }
}
