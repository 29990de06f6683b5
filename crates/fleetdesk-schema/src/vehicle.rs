use crate::types::{DriverId, VehicleId};
use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
    PendingHandover,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 4] = [
        VehicleStatus::Available,
        VehicleStatus::InUse,
        VehicleStatus::Maintenance,
        VehicleStatus::PendingHandover,
    ];

    /// Whether a vehicle in this status must have a current driver.
    pub fn requires_driver(self) -> bool {
        matches!(self, VehicleStatus::InUse | VehicleStatus::PendingHandover)
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleStatus::Available => write!(f, "available"),
            VehicleStatus::InUse => write!(f, "in-use"),
            VehicleStatus::Maintenance => write!(f, "maintenance"),
            VehicleStatus::PendingHandover => write!(f, "pending-handover"),
        }
    }
}

/// Tank level as reported on the dashboard gauge, in quarters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FuelLevel {
    Empty,
    OneQuarter,
    Half,
    ThreeQuarters,
    Full,
}

impl FuelLevel {
    pub const ALL: [FuelLevel; 5] = [
        FuelLevel::Empty,
        FuelLevel::OneQuarter,
        FuelLevel::Half,
        FuelLevel::ThreeQuarters,
        FuelLevel::Full,
    ];
}

impl fmt::Display for FuelLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelLevel::Empty => write!(f, "empty"),
            FuelLevel::OneQuarter => write!(f, "1/4"),
            FuelLevel::Half => write!(f, "1/2"),
            FuelLevel::ThreeQuarters => write!(f, "3/4"),
            FuelLevel::Full => write!(f, "full"),
        }
    }
}

impl FromStr for FuelLevel {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" | "vazio" | "0" => Ok(FuelLevel::Empty),
            "1/4" | "quarter" | "onequarter" | "one-quarter" => Ok(FuelLevel::OneQuarter),
            "1/2" | "half" => Ok(FuelLevel::Half),
            "3/4" | "threequarters" | "three-quarters" => Ok(FuelLevel::ThreeQuarters),
            "full" | "cheio" => Ok(FuelLevel::Full),
            _ => Err(SchemaError::UnknownFuelLevel(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FuelType {
    Gasoline,
    Ethanol,
    CommonDiesel,
    S10Diesel,
    Arla32,
    Electric,
    Hybrid,
    Flex,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VehicleType {
    LightCar,
    Suv,
    Van,
    CargoVan,
    Truck,
    Bus,
    Pickup,
    AgriculturalTractor,
    CrawlerTractor,
    MotorGrader,
    WheelLoader,
    BackhoeLoader,
    HydraulicExcavator,
    Harvester,
}

/// Display-only GPS state. Nothing in the lifecycle reads it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GpsStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastLocation {
    pub timestamp: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub status: VehicleStatus,
    pub location: String,
    pub model: String,
    pub brand: String,
    pub license_plate: String,
    pub fuel_type: FuelType,
    pub year: u16,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub has_arla32: bool,
    pub current_driver_id: Option<DriverId>,
    pub mileage: u64,
    pub fuel_level: FuelLevel,
    #[serde(default)]
    pub handover_to_driver_id: Option<DriverId>,
    #[serde(default)]
    pub handover_justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_location: Option<LastLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_status: Option<GpsStatus>,
}

impl Vehicle {
    /// Check the status/driver coupling rules on this record.
    ///
    /// A current driver is present exactly while the vehicle is in use or
    /// pending a handover, and a handover target (with its justification)
    /// exists exactly while the vehicle is pending a handover.
    pub fn check_coupling(&self) -> Result<(), String> {
        if self.status.requires_driver() != self.current_driver_id.is_some() {
            return Err(format!(
                "vehicle {} is {} but current driver is {}",
                self.id,
                self.status,
                self.current_driver_id
                    .as_ref()
                    .map_or("unset", |_| "set")
            ));
        }
        let pending = self.status == VehicleStatus::PendingHandover;
        if pending != self.handover_to_driver_id.is_some() {
            return Err(format!(
                "vehicle {} is {} but handover target is {}",
                self.id,
                self.status,
                self.handover_to_driver_id
                    .as_ref()
                    .map_or("unset", |_| "set")
            ));
        }
        if !pending && self.handover_justification.is_some() {
            return Err(format!(
                "vehicle {} carries a handover justification outside a pending handover",
                self.id
            ));
        }
        Ok(())
    }

    pub fn is_held_by(&self, driver: &DriverId) -> bool {
        self.current_driver_id.as_ref() == Some(driver)
    }

    pub fn label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.license_plate)
    }
}

/// Partial update of the engine-owned fields of a [`Vehicle`].
///
/// `None` leaves a field untouched. Nullable fields use `Option<Option<_>>`,
/// where `Some(None)` clears the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehiclePatch {
    pub status: Option<VehicleStatus>,
    pub current_driver_id: Option<Option<DriverId>>,
    pub mileage: Option<u64>,
    pub fuel_level: Option<FuelLevel>,
    pub handover_to_driver_id: Option<Option<DriverId>>,
    pub handover_justification: Option<Option<String>>,
}

impl VehiclePatch {
    pub fn is_empty(&self) -> bool {
        *self == VehiclePatch::default()
    }

    pub fn apply_to(&self, vehicle: &mut Vehicle) {
        if let Some(status) = self.status {
            vehicle.status = status;
        }
        if let Some(ref driver) = self.current_driver_id {
            vehicle.current_driver_id.clone_from(driver);
        }
        if let Some(mileage) = self.mileage {
            vehicle.mileage = mileage;
        }
        if let Some(level) = self.fuel_level {
            vehicle.fuel_level = level;
        }
        if let Some(ref target) = self.handover_to_driver_id {
            vehicle.handover_to_driver_id.clone_from(target);
        }
        if let Some(ref justification) = self.handover_justification {
            vehicle.handover_justification.clone_from(justification);
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_vehicle() -> Vehicle {
    Vehicle {
        id: VehicleId::new("CAR-001"),
        status: VehicleStatus::Available,
        location: "Garagem".to_owned(),
        model: "Palio".to_owned(),
        brand: "Fiat".to_owned(),
        license_plate: "DW19A94".to_owned(),
        fuel_type: FuelType::Flex,
        year: 2008,
        vehicle_type: VehicleType::LightCar,
        has_arla32: false,
        current_driver_id: None,
        mileage: 100_000,
        fuel_level: FuelLevel::Full,
        handover_to_driver_id: None,
        handover_justification: None,
        last_location: None,
        gps_status: None,
    }
}
