//! Turns a [`Command`] into the [`MutationBatch`] that carries it out.
//!
//! Planning only reads the store. Every precondition is checked here, so a
//! command either yields a complete batch or fails without any side effect.

use crate::command::Command;
use crate::config::{EngineConfig, MissingTripPolicy};
use crate::lifecycle::validate_transition;
use crate::CoreError;
use chrono::{DateTime, Utc};
use fleetdesk_schema::{
    DriverId, FuelLevel, Trip, TripPatch, Vehicle, VehicleId, VehiclePatch, VehicleStatus,
};
use fleetdesk_store::{FleetStore, MutationBatch};
use tracing::{debug, warn};

/// Plan `command` against the current state of `store`.
pub fn plan(
    store: &FleetStore,
    command: &Command,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<MutationBatch, CoreError> {
    Planner::new(store, config, now).plan(command)
}

pub struct Planner<'a> {
    pub(crate) store: &'a FleetStore,
    pub(crate) config: &'a EngineConfig,
    pub(crate) now: DateTime<Utc>,
}

impl<'a> Planner<'a> {
    pub fn new(store: &'a FleetStore, config: &'a EngineConfig, now: DateTime<Utc>) -> Self {
        Self { store, config, now }
    }

    pub fn plan(&self, command: &Command) -> Result<MutationBatch, CoreError> {
        command.validate()?;
        debug!("planning {command}");
        match command {
            Command::CheckOut {
                vehicle,
                driver,
                start_mileage,
                start_fuel_level,
                destination,
                purpose,
            } => self.check_out(
                vehicle,
                driver,
                *start_mileage,
                *start_fuel_level,
                destination,
                purpose,
            ),
            Command::CheckIn {
                vehicle,
                end_mileage,
                end_fuel_level,
            } => self.check_in(vehicle, *end_mileage, *end_fuel_level),
            Command::InitiateHandover {
                vehicle,
                target_driver,
                justification,
            } => self.initiate_handover(vehicle, target_driver, justification),
            Command::AcceptHandover {
                vehicle,
                start_mileage,
                start_fuel_level,
                destination,
                purpose,
            } => self.accept_handover(
                vehicle,
                *start_mileage,
                *start_fuel_level,
                destination,
                purpose,
            ),
            Command::RejectHandover { vehicle } => self.reject_handover(vehicle),
            Command::TogglePause { vehicle } => self.toggle_pause(vehicle),
        }
    }

    /// Available -> InUse, opening a trip for `driver`.
    pub fn check_out(
        &self,
        vehicle_id: &VehicleId,
        driver: &DriverId,
        start_mileage: u64,
        start_fuel_level: FuelLevel,
        destination: &str,
        purpose: &str,
    ) -> Result<MutationBatch, CoreError> {
        let vehicle = self.store.vehicle(vehicle_id)?;
        validate_transition(vehicle_id, vehicle.status, VehicleStatus::InUse)?;
        self.store.driver(driver)?;
        guard_mileage(vehicle, start_mileage)?;

        let origin = self
            .config
            .checkout_origin
            .clone()
            .unwrap_or_else(|| vehicle.location.clone());

        let mut batch = MutationBatch::new();
        batch
            .patch_vehicle(
                vehicle_id.clone(),
                VehiclePatch {
                    status: Some(VehicleStatus::InUse),
                    current_driver_id: Some(Some(driver.clone())),
                    mileage: Some(start_mileage),
                    fuel_level: Some(start_fuel_level),
                    ..VehiclePatch::default()
                },
            )
            .create_trip(self.new_trip(
                vehicle_id,
                driver,
                start_mileage,
                start_fuel_level,
                origin,
                destination,
                purpose,
            ));
        Ok(batch)
    }

    /// InUse -> Available, closing the open trip.
    pub fn check_in(
        &self,
        vehicle_id: &VehicleId,
        end_mileage: u64,
        end_fuel_level: FuelLevel,
    ) -> Result<MutationBatch, CoreError> {
        let vehicle = self.store.vehicle(vehicle_id)?;
        validate_transition(vehicle_id, vehicle.status, VehicleStatus::Available)?;
        guard_mileage(vehicle, end_mileage)?;

        let mut batch = MutationBatch::new();
        if let Some(trip) = self.open_trip_or_policy(vehicle_id)? {
            guard_clock(trip, self.now)?;
            batch.patch_trip(
                trip.id.clone(),
                TripPatch::close(self.now, end_mileage, Some(end_fuel_level)),
            );
        }
        batch.patch_vehicle(
            vehicle_id.clone(),
            VehiclePatch {
                status: Some(VehicleStatus::Available),
                current_driver_id: Some(None),
                mileage: Some(end_mileage),
                fuel_level: Some(end_fuel_level),
                ..VehiclePatch::default()
            },
        );
        Ok(batch)
    }

    /// Flip the pause flag of the open trip. No open trip means nothing to do.
    pub fn toggle_pause(&self, vehicle_id: &VehicleId) -> Result<MutationBatch, CoreError> {
        self.store.vehicle(vehicle_id)?;
        let mut batch = MutationBatch::new();
        match self.store.open_trip_for(vehicle_id) {
            Some(trip) => {
                batch.patch_trip(
                    trip.id.clone(),
                    TripPatch {
                        is_paused: Some(!trip.is_paused),
                        ..TripPatch::default()
                    },
                );
            }
            None => debug!("vehicle {vehicle_id} has no open trip, pause toggle ignored"),
        }
        Ok(batch)
    }

    /// The vehicle's open trip, or `None` when the missing-trip policy lets
    /// the command go ahead without one.
    pub(crate) fn open_trip_or_policy(
        &self,
        vehicle_id: &VehicleId,
    ) -> Result<Option<&'a Trip>, CoreError> {
        match self.store.open_trip_for(vehicle_id) {
            Some(trip) => Ok(Some(trip)),
            None => match self.config.missing_trip_policy {
                MissingTripPolicy::Fail => Err(CoreError::NoActiveTrip(vehicle_id.to_string())),
                MissingTripPolicy::Proceed => {
                    warn!("vehicle {vehicle_id} has no open trip, proceeding without one");
                    Ok(None)
                }
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_trip(
        &self,
        vehicle_id: &VehicleId,
        driver: &DriverId,
        start_mileage: u64,
        start_fuel_level: FuelLevel,
        origin: String,
        destination: &str,
        purpose: &str,
    ) -> Trip {
        Trip {
            id: self.store.peek_trip_id(),
            vehicle_id: vehicle_id.clone(),
            driver_id: driver.clone(),
            start_time: self.now,
            end_time: None,
            start_mileage,
            end_mileage: None,
            start_fuel_level,
            end_fuel_level: None,
            origin: Some(origin),
            destination: destination.trim().to_owned(),
            purpose: purpose.trim().to_owned(),
            is_paused: false,
        }
    }
}

/// Odometers only move forward.
pub(crate) fn guard_mileage(vehicle: &Vehicle, reported: u64) -> Result<(), CoreError> {
    if reported < vehicle.mileage {
        return Err(CoreError::MileageRegression {
            vehicle: vehicle.id.to_string(),
            current: vehicle.mileage,
            reported,
        });
    }
    Ok(())
}

/// A trip cannot close before it started.
pub(crate) fn guard_clock(trip: &Trip, now: DateTime<Utc>) -> Result<(), CoreError> {
    if now < trip.start_time {
        return Err(CoreError::ClockRegression {
            trip: trip.id.to_string(),
            started: trip.start_time.to_rfc3339(),
            at: now.to_rfc3339(),
        });
    }
    Ok(())
}
