//! Entity types, identifiers and patches for the fleetdesk fleet model.
//!
//! This crate defines the data layer shared by the store and the lifecycle
//! engine: typed identifiers (`VehicleId`, `DriverId`, `TripId`, ...), the
//! `Vehicle` and `Trip` records with their partial-update patches, driver and
//! user profiles, and the bookkeeping records (fuel logs, incidents,
//! maintenance schedules, messages).

pub mod people;
pub mod records;
pub mod trip;
pub mod types;
pub mod vehicle;

pub use people::{CnhCategory, Driver, DriverRole, User, UserRole};
pub use records::{
    FuelLog, IncidentLocation, IncidentReport, IncidentSeverity, IncidentType,
    MaintenanceSchedule, MaintenanceStatus, Message, MessageTarget,
};
pub use trip::{Trip, TripPatch};
pub use types::{
    DriverId, FuelLogId, IncidentId, MessageId, ScheduleId, TripId, UserId, VehicleId,
};
pub use vehicle::{
    FuelLevel, FuelType, GpsStatus, LastLocation, Vehicle, VehiclePatch, VehicleStatus,
    VehicleType,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown fuel level '{0}', expected one of: empty, 1/4, 1/2, 3/4, full")]
    UnknownFuelLevel(String),
}
