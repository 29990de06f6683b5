//! Append-mostly bookkeeping records. They reference vehicles and drivers but
//! take no part in the lifecycle rules.

use crate::types::{DriverId, FuelLogId, IncidentId, MessageId, ScheduleId, VehicleId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelLog {
    pub id: FuelLogId,
    pub vehicle_id: VehicleId,
    pub driver_id: DriverId,
    pub date: NaiveDate,
    pub liters: f64,
    pub price_per_liter: f64,
    pub total_cost: f64,
    pub mileage: u64,
    pub record_type: String,
    pub fuel_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_station: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_photo_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_file_filename: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IncidentType {
    Scratch,
    Dent,
    Crack,
    Broken,
    Missing,
    Worn,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IncidentLocation {
    Windshield,
    FrontBumper,
    RearBumper,
    LeftDoor,
    RightDoor,
    Hood,
    Roof,
    RearWindow,
    LeftMirror,
    RightMirror,
    Wheels,
    Interior,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentReport {
    pub id: IncidentId,
    pub vehicle_id: VehicleId,
    pub driver_id: DriverId,
    pub date: DateTime<Utc>,
    pub description: String,
    pub severity: IncidentSeverity,
    pub kind: IncidentType,
    pub location: IncidentLocation,
    #[serde(default)]
    pub photo_filenames: Vec<String>,
    #[serde(default)]
    pub document_filenames: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceSchedule {
    pub id: ScheduleId,
    pub vehicle_id: VehicleId,
    pub workshop: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_phone: Option<String>,
    pub date_time: DateTime<Utc>,
    pub description: String,
    pub status: MaintenanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// Recipient of an internal message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageTarget {
    All,
    Driver(DriverId),
}

impl MessageTarget {
    pub fn addresses(&self, driver: &DriverId) -> bool {
        match self {
            MessageTarget::All => true,
            MessageTarget::Driver(id) => id == driver,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub title: String,
    pub content: String,
    pub target: MessageTarget,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Message {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
