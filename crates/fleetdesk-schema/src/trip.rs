use crate::types::{DriverId, TripId, VehicleId};
use crate::vehicle::FuelLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A period of vehicle usage by one driver.
///
/// A trip with no `end_time` is open; each vehicle has at most one open trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub vehicle_id: VehicleId,
    pub driver_id: DriverId,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub start_mileage: u64,
    #[serde(default)]
    pub end_mileage: Option<u64>,
    pub start_fuel_level: FuelLevel,
    #[serde(default)]
    pub end_fuel_level: Option<FuelLevel>,
    #[serde(default)]
    pub origin: Option<String>,
    pub destination: String,
    pub purpose: String,
    #[serde(default)]
    pub is_paused: bool,
}

impl Trip {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Distance covered, once the trip is closed.
    pub fn distance(&self) -> Option<u64> {
        self.end_mileage
            .map(|end| end.saturating_sub(self.start_mileage))
    }
}

/// Partial update of the closing and pause fields of a [`Trip`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripPatch {
    pub end_time: Option<DateTime<Utc>>,
    pub end_mileage: Option<u64>,
    pub end_fuel_level: Option<FuelLevel>,
    pub is_paused: Option<bool>,
}

impl TripPatch {
    /// Patch closing a trip at the given instant and odometer reading.
    pub fn close(at: DateTime<Utc>, mileage: u64, fuel_level: Option<FuelLevel>) -> Self {
        Self {
            end_time: Some(at),
            end_mileage: Some(mileage),
            end_fuel_level: fuel_level,
            is_paused: Some(false),
        }
    }

    pub fn apply_to(&self, trip: &mut Trip) {
        if let Some(at) = self.end_time {
            trip.end_time = Some(at);
        }
        if let Some(mileage) = self.end_mileage {
            trip.end_mileage = Some(mileage);
        }
        if let Some(level) = self.end_fuel_level {
            trip.end_fuel_level = Some(level);
        }
        if let Some(paused) = self.is_paused {
            trip.is_paused = paused;
        }
    }
}
