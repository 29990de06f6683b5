use crate::batch::{Mutation, MutationBatch};
use crate::integrity::verify_fleet_integrity;
use crate::StoreError;
use fleetdesk_schema::{
    Driver, DriverId, FuelLog, FuelLogId, IncidentId, IncidentReport, MaintenanceSchedule,
    Message, Trip, TripId, TripPatch, User, UserId, Vehicle, VehicleId, VehiclePatch,
    VehicleStatus,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Canonical in-memory collections of the fleet.
///
/// Vehicle status, driver assignment and handover fields are only changed
/// through [`FleetStore::apply`]; the CRUD helpers below touch profile data
/// and the bookkeeping records.
#[derive(Debug, Clone, Default)]
pub struct FleetStore {
    pub(crate) vehicles: BTreeMap<VehicleId, Vehicle>,
    pub(crate) drivers: BTreeMap<DriverId, Driver>,
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) trips: Vec<Trip>,
    pub(crate) fuel_logs: Vec<FuelLog>,
    pub(crate) incident_reports: Vec<IncidentReport>,
    pub(crate) schedules: Vec<MaintenanceSchedule>,
    pub(crate) messages: Vec<Message>,
    pub(crate) sequence: u64,
}

impl FleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- lifecycle primitives ---

    pub fn vehicle(&self, id: &str) -> Result<&Vehicle, StoreError> {
        self.vehicles
            .get(id)
            .ok_or_else(|| StoreError::VehicleNotFound(id.to_owned()))
    }

    pub fn driver(&self, id: &str) -> Result<&Driver, StoreError> {
        self.drivers
            .get(id)
            .ok_or_else(|| StoreError::DriverNotFound(id.to_owned()))
    }

    pub fn trip(&self, id: &str) -> Result<&Trip, StoreError> {
        self.trips
            .iter()
            .find(|t| *t.id == *id)
            .ok_or_else(|| StoreError::TripNotFound(id.to_owned()))
    }

    /// The trip of `vehicle_id` that has not been closed yet, if any.
    pub fn open_trip_for(&self, vehicle_id: &str) -> Option<&Trip> {
        self.trips
            .iter()
            .find(|t| *t.vehicle_id == *vehicle_id && t.is_open())
    }

    /// Apply a batch of vehicle and trip mutations all-or-nothing.
    ///
    /// Mutations are staged on a copy of the vehicle and trip collections.
    /// Every vehicle the batch touches is re-checked against the lifecycle
    /// invariants before the staged copy replaces the live one. On any error
    /// the store is left exactly as it was.
    pub fn apply(&mut self, batch: MutationBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut vehicles = self.vehicles.clone();
        let mut trips = self.trips.clone();
        let mut touched: Vec<VehicleId> = Vec::new();

        for mutation in batch.iter() {
            match mutation {
                Mutation::PatchVehicle { id, patch } => {
                    let vehicle = vehicles
                        .get_mut(id)
                        .ok_or_else(|| StoreError::VehicleNotFound(id.to_string()))?;
                    patch.apply_to(vehicle);
                    touched.push(id.clone());
                }
                Mutation::PatchTrip { id, patch } => {
                    let trip = trips
                        .iter_mut()
                        .find(|t| t.id == *id)
                        .ok_or_else(|| StoreError::TripNotFound(id.to_string()))?;
                    patch.apply_to(trip);
                    touched.push(trip.vehicle_id.clone());
                }
                Mutation::CreateTrip(trip) => {
                    if trips.iter().any(|t| t.id == trip.id) {
                        return Err(StoreError::DuplicateId {
                            kind: "trip",
                            id: trip.id.to_string(),
                        });
                    }
                    if !vehicles.contains_key(&trip.vehicle_id) {
                        return Err(StoreError::VehicleNotFound(trip.vehicle_id.to_string()));
                    }
                    trips.push(trip.clone());
                    touched.push(trip.vehicle_id.clone());
                }
            }
        }

        touched.sort();
        touched.dedup();
        for id in &touched {
            check_vehicle_invariants(&vehicles, &trips, id)?;
        }

        debug!(
            "applied {} mutation(s) touching {} vehicle(s)",
            batch.len(),
            touched.len()
        );
        self.vehicles = vehicles;
        self.trips = trips;
        for trip in batch.created_trips() {
            self.advance_sequence_past(&trip.id);
        }
        Ok(())
    }

    pub fn apply_vehicle_patch(&mut self, id: &VehicleId, patch: VehiclePatch) -> Result<(), StoreError> {
        let mut batch = MutationBatch::new();
        batch.patch_vehicle(id.clone(), patch);
        self.apply(batch)
    }

    pub fn apply_trip_patch(&mut self, id: &TripId, patch: TripPatch) -> Result<(), StoreError> {
        let mut batch = MutationBatch::new();
        batch.patch_trip(id.clone(), patch);
        self.apply(batch)
    }

    pub fn create_trip(&mut self, trip: Trip) -> Result<(), StoreError> {
        let mut batch = MutationBatch::new();
        batch.create_trip(trip);
        self.apply(batch)
    }

    /// Allocate a fresh id of the form `{prefix}-{n:06}` not used by any record.
    pub fn allocate_id(&mut self, prefix: &str) -> String {
        loop {
            self.sequence += 1;
            let candidate = format!("{prefix}-{:06}", self.sequence);
            if !self.id_taken(&candidate) {
                return candidate;
            }
        }
    }

    fn id_taken(&self, id: &str) -> bool {
        self.trips.iter().any(|t| *t.id == *id)
            || self.fuel_logs.iter().any(|l| *l.id == *id)
            || self.incident_reports.iter().any(|r| *r.id == *id)
            || self.schedules.iter().any(|s| *s.id == *id)
            || self.messages.iter().any(|m| *m.id == *id)
    }

    /// The id [`FleetStore::allocate_id`] would hand out next, without
    /// reserving it.
    pub fn peek_id(&self, prefix: &str) -> String {
        let mut n = self.sequence;
        loop {
            n += 1;
            let candidate = format!("{prefix}-{n:06}");
            if !self.id_taken(&candidate) {
                return candidate;
            }
        }
    }

    pub fn peek_trip_id(&self) -> TripId {
        TripId::new(self.peek_id("TRIP"))
    }

    fn advance_sequence_past(&mut self, id: &str) {
        let n = id
            .rsplit_once('-')
            .and_then(|(_, suffix)| suffix.parse::<u64>().ok());
        if let Some(n) = n {
            self.sequence = self.sequence.max(n);
        }
    }

    /// Run the full invariant check over every vehicle and trip.
    pub fn check_invariants(&self) -> Result<(), StoreError> {
        let report = verify_fleet_integrity(self);
        match report.failed.first() {
            None => Ok(()),
            Some(first) => Err(StoreError::InvariantViolation(format!(
                "{} ({} failure(s) in total)",
                first,
                report.failed.len()
            ))),
        }
    }

    // --- vehicles ---

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Register a vehicle. New vehicles enter the fleet idle: available or in
    /// maintenance, with no driver and no handover.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<(), StoreError> {
        if self.vehicles.contains_key(&vehicle.id) {
            return Err(StoreError::DuplicateId {
                kind: "vehicle",
                id: vehicle.id.to_string(),
            });
        }
        if !matches!(
            vehicle.status,
            VehicleStatus::Available | VehicleStatus::Maintenance
        ) {
            return Err(StoreError::VehicleBusy {
                id: vehicle.id.to_string(),
                status: vehicle.status.to_string(),
                action: "registered",
            });
        }
        vehicle
            .check_coupling()
            .map_err(StoreError::InvariantViolation)?;
        info!("registered vehicle {}", vehicle.id);
        self.vehicles.insert(vehicle.id.clone(), vehicle);
        Ok(())
    }

    /// Replace the descriptive fields of a vehicle.
    ///
    /// Status, driver, handover, mileage and fuel level are kept from the
    /// stored record.
    pub fn update_vehicle_profile(&mut self, update: Vehicle) -> Result<(), StoreError> {
        let current = self
            .vehicles
            .get_mut(&update.id)
            .ok_or_else(|| StoreError::VehicleNotFound(update.id.to_string()))?;
        current.location = update.location;
        current.model = update.model;
        current.brand = update.brand;
        current.license_plate = update.license_plate;
        current.fuel_type = update.fuel_type;
        current.year = update.year;
        current.vehicle_type = update.vehicle_type;
        current.has_arla32 = update.has_arla32;
        current.last_location = update.last_location;
        current.gps_status = update.gps_status;
        Ok(())
    }

    /// Move an idle vehicle into or out of maintenance.
    pub fn set_maintenance(&mut self, id: &str, in_maintenance: bool) -> Result<(), StoreError> {
        let vehicle = self
            .vehicles
            .get_mut(id)
            .ok_or_else(|| StoreError::VehicleNotFound(id.to_owned()))?;
        let (from, to) = if in_maintenance {
            (VehicleStatus::Available, VehicleStatus::Maintenance)
        } else {
            (VehicleStatus::Maintenance, VehicleStatus::Available)
        };
        if vehicle.status == to {
            return Ok(());
        }
        if vehicle.status != from {
            return Err(StoreError::VehicleBusy {
                id: id.to_owned(),
                status: vehicle.status.to_string(),
                action: if in_maintenance {
                    "sent to maintenance"
                } else {
                    "released from maintenance"
                },
            });
        }
        vehicle.status = to;
        info!("vehicle {id} is now {to}");
        Ok(())
    }

    /// Delete a vehicle. Its trips stay in the history.
    pub fn remove_vehicle(&mut self, id: &str) -> Result<Vehicle, StoreError> {
        let vehicle = self.vehicle(id)?;
        if vehicle.status.requires_driver() {
            return Err(StoreError::VehicleBusy {
                id: id.to_owned(),
                status: vehicle.status.to_string(),
                action: "removed",
            });
        }
        if self.open_trip_for(id).is_some() {
            return Err(StoreError::InvariantViolation(format!(
                "vehicle {id} still has an open trip"
            )));
        }
        self.vehicles
            .remove(id)
            .ok_or_else(|| StoreError::VehicleNotFound(id.to_owned()))
    }

    // --- drivers ---

    pub fn drivers(&self) -> impl Iterator<Item = &Driver> {
        self.drivers.values()
    }

    pub fn add_driver(&mut self, driver: Driver) -> Result<(), StoreError> {
        if self.drivers.contains_key(&driver.id) {
            return Err(StoreError::DuplicateId {
                kind: "driver",
                id: driver.id.to_string(),
            });
        }
        self.drivers.insert(driver.id.clone(), driver);
        Ok(())
    }

    pub fn update_driver(&mut self, driver: Driver) -> Result<(), StoreError> {
        let slot = self
            .drivers
            .get_mut(&driver.id)
            .ok_or_else(|| StoreError::DriverNotFound(driver.id.to_string()))?;
        *slot = driver;
        Ok(())
    }

    /// Delete a driver who neither holds a vehicle nor is the target of a
    /// pending handover.
    pub fn remove_driver(&mut self, id: &str) -> Result<Driver, StoreError> {
        if let Some(vehicle) = self.vehicles.values().find(|v| {
            v.current_driver_id.as_deref() == Some(id)
                || v.handover_to_driver_id.as_deref() == Some(id)
        }) {
            return Err(StoreError::DriverInUse {
                id: id.to_owned(),
                vehicle: vehicle.id.to_string(),
            });
        }
        self.drivers
            .remove(id)
            .ok_or_else(|| StoreError::DriverNotFound(id.to_owned()))
    }

    // --- users ---

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn user(&self, id: &str) -> Result<&User, StoreError> {
        self.users
            .get(id)
            .ok_or_else(|| StoreError::UserNotFound(id.to_owned()))
    }

    pub fn add_user(&mut self, user: User) -> Result<(), StoreError> {
        if self.users.contains_key(&user.id) {
            return Err(StoreError::DuplicateId {
                kind: "user",
                id: user.id.to_string(),
            });
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    pub fn update_user(&mut self, user: User) -> Result<(), StoreError> {
        let slot = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| StoreError::UserNotFound(user.id.to_string()))?;
        *slot = user;
        Ok(())
    }

    pub fn remove_user(&mut self, id: &str) -> Result<User, StoreError> {
        self.users
            .remove(id)
            .ok_or_else(|| StoreError::UserNotFound(id.to_owned()))
    }

    // --- bookkeeping records ---

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn fuel_logs(&self) -> &[FuelLog] {
        &self.fuel_logs
    }

    pub fn incident_reports(&self) -> &[IncidentReport] {
        &self.incident_reports
    }

    /// Maintenance schedules, earliest first.
    pub fn schedules(&self) -> &[MaintenanceSchedule] {
        &self.schedules
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Record a refuelling. The record gets a fresh `FUEL-` id, and the
    /// vehicle's odometer moves forward when the logged mileage is ahead of it.
    pub fn add_fuel_log(&mut self, mut log: FuelLog) -> Result<FuelLogId, StoreError> {
        if !self.vehicles.contains_key(&log.vehicle_id) {
            return Err(StoreError::VehicleNotFound(log.vehicle_id.to_string()));
        }
        log.id = FuelLogId::new(self.allocate_id("FUEL"));
        if let Some(vehicle) = self.vehicles.get_mut(&log.vehicle_id) {
            if log.mileage > vehicle.mileage {
                debug!(
                    "fuel log moves {} odometer {} -> {}",
                    vehicle.id, vehicle.mileage, log.mileage
                );
                vehicle.mileage = log.mileage;
            }
        }
        let id = log.id.clone();
        self.fuel_logs.push(log);
        Ok(id)
    }

    /// File an incident report under a fresh `INC-` id.
    pub fn add_incident_report(&mut self, mut report: IncidentReport) -> Result<IncidentId, StoreError> {
        if !self.vehicles.contains_key(&report.vehicle_id) {
            return Err(StoreError::VehicleNotFound(report.vehicle_id.to_string()));
        }
        report.id = IncidentId::new(self.allocate_id("INC"));
        let id = report.id.clone();
        self.incident_reports.push(report);
        Ok(id)
    }

    pub fn add_schedule(&mut self, schedule: MaintenanceSchedule) -> Result<(), StoreError> {
        if !self.vehicles.contains_key(&schedule.vehicle_id) {
            return Err(StoreError::VehicleNotFound(schedule.vehicle_id.to_string()));
        }
        if self.schedules.iter().any(|s| s.id == schedule.id) {
            return Err(StoreError::DuplicateId {
                kind: "schedule",
                id: schedule.id.to_string(),
            });
        }
        let at = self
            .schedules
            .partition_point(|s| s.date_time <= schedule.date_time);
        self.schedules.insert(at, schedule);
        Ok(())
    }

    pub fn add_message(&mut self, message: Message) -> Result<(), StoreError> {
        if self.messages.iter().any(|m| m.id == message.id) {
            return Err(StoreError::DuplicateId {
                kind: "message",
                id: message.id.to_string(),
            });
        }
        self.messages.push(message);
        Ok(())
    }
}

fn check_vehicle_invariants(
    vehicles: &BTreeMap<VehicleId, Vehicle>,
    trips: &[Trip],
    id: &VehicleId,
) -> Result<(), StoreError> {
    let vehicle = vehicles
        .get(id)
        .ok_or_else(|| StoreError::VehicleNotFound(id.to_string()))?;
    vehicle
        .check_coupling()
        .map_err(StoreError::InvariantViolation)?;

    for trip in trips.iter().filter(|t| t.vehicle_id == *id) {
        if let Some(end) = trip.end_time {
            if end < trip.start_time {
                return Err(StoreError::InvariantViolation(format!(
                    "trip {} of vehicle {id} would end before it started",
                    trip.id
                )));
            }
        }
    }

    let mut open = trips.iter().filter(|t| t.vehicle_id == *id && t.is_open());
    if let Some(trip) = open.next() {
        if open.next().is_some() {
            return Err(StoreError::InvariantViolation(format!(
                "vehicle {id} would have more than one open trip"
            )));
        }
        if vehicle.current_driver_id.as_ref() != Some(&trip.driver_id) {
            return Err(StoreError::InvariantViolation(format!(
                "open trip {} of vehicle {id} belongs to {}, not the current holder",
                trip.id, trip.driver_id
            )));
        }
    }
    Ok(())
}
