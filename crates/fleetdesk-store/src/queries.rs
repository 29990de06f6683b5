//! Read-only views over the store used by dashboards and listings.

use crate::store::FleetStore;
use chrono::{DateTime, NaiveDate, Utc};
use fleetdesk_schema::{
    Driver, DriverId, FuelLog, IncidentReport, MaintenanceSchedule, Message, Trip, Vehicle,
    VehicleStatus,
};
use serde::Serialize;

/// Vehicle counts per status, as shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct FleetSummary {
    pub total: usize,
    pub available: usize,
    pub in_use: usize,
    pub maintenance: usize,
    pub pending_handover: usize,
}

/// Criteria for [`FleetStore::trip_history`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    pub vehicle: Option<String>,
    pub driver: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub open_only: bool,
}

impl TripFilter {
    pub fn matches(&self, trip: &Trip) -> bool {
        if let Some(ref v) = self.vehicle {
            if *trip.vehicle_id != **v {
                return false;
            }
        }
        if let Some(ref d) = self.driver {
            if *trip.driver_id != **d {
                return false;
            }
        }
        if self.from.is_some_and(|from| trip.start_time < from) {
            return false;
        }
        if self.to.is_some_and(|to| trip.start_time > to) {
            return false;
        }
        !self.open_only || trip.is_open()
    }
}

impl FleetStore {
    pub fn summary(&self) -> FleetSummary {
        let mut summary = FleetSummary::default();
        for vehicle in self.vehicles.values() {
            summary.total += 1;
            match vehicle.status {
                VehicleStatus::Available => summary.available += 1,
                VehicleStatus::InUse => summary.in_use += 1,
                VehicleStatus::Maintenance => summary.maintenance += 1,
                VehicleStatus::PendingHandover => summary.pending_handover += 1,
            }
        }
        summary
    }

    /// Trips matching `filter`, most recent start first.
    pub fn trip_history(&self, filter: &TripFilter) -> Vec<&Trip> {
        let mut trips: Vec<&Trip> = self.trips.iter().filter(|t| filter.matches(t)).collect();
        trips.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        trips
    }

    pub fn trips_for_vehicle(&self, vehicle_id: &str) -> Vec<&Trip> {
        self.trip_history(&TripFilter {
            vehicle: Some(vehicle_id.to_owned()),
            ..TripFilter::default()
        })
    }

    pub fn trips_for_driver(&self, driver_id: &str) -> Vec<&Trip> {
        self.trip_history(&TripFilter {
            driver: Some(driver_id.to_owned()),
            ..TripFilter::default()
        })
    }

    /// Vehicles whose current driver is `driver` (in use or offered onward).
    pub fn vehicles_held_by<'a>(&'a self, driver: &'a DriverId) -> impl Iterator<Item = &'a Vehicle> {
        self.vehicles.values().filter(move |v| v.is_held_by(driver))
    }

    /// Handovers waiting for `driver` to accept or reject.
    pub fn pending_handovers_for<'a>(
        &'a self,
        driver: &'a DriverId,
    ) -> impl Iterator<Item = &'a Vehicle> {
        self.vehicles.values().filter(move |v| {
            v.status == VehicleStatus::PendingHandover
                && v.handover_to_driver_id.as_ref() == Some(driver)
        })
    }

    /// Handovers `driver` has proposed that are still unresolved.
    pub fn pending_handovers_by<'a>(
        &'a self,
        driver: &'a DriverId,
    ) -> impl Iterator<Item = &'a Vehicle> {
        self.vehicles
            .values()
            .filter(move |v| v.status == VehicleStatus::PendingHandover && v.is_held_by(driver))
    }

    /// Unexpired messages, newest first. With a driver, only the ones
    /// addressed to everyone or to that driver.
    pub fn active_messages(&self, now: DateTime<Utc>, driver: Option<&DriverId>) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self
            .messages
            .iter()
            .filter(|m| m.is_active(now))
            .filter(|m| driver.map_or(true, |d| m.target.addresses(d)))
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages
    }

    pub fn fuel_logs_for(&self, vehicle_id: &str) -> Vec<&FuelLog> {
        self.fuel_logs
            .iter()
            .filter(|l| *l.vehicle_id == *vehicle_id)
            .collect()
    }

    pub fn incidents_for(&self, vehicle_id: &str) -> Vec<&IncidentReport> {
        self.incident_reports
            .iter()
            .filter(|r| *r.vehicle_id == *vehicle_id)
            .collect()
    }

    pub fn schedules_for(&self, vehicle_id: &str) -> Vec<&MaintenanceSchedule> {
        self.schedules
            .iter()
            .filter(|s| *s.vehicle_id == *vehicle_id)
            .collect()
    }

    /// Drivers whose licence has lapsed on `on`.
    pub fn expired_licenses(&self, on: NaiveDate) -> Vec<&Driver> {
        self.drivers
            .values()
            .filter(|d| d.license_expired(on))
            .collect()
    }
}
