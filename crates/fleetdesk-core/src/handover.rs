//! Driver-to-driver handover: propose, accept, reject.

use crate::lifecycle::validate_transition;
use crate::planner::{guard_clock, guard_mileage, Planner};
use crate::CoreError;
use fleetdesk_schema::{DriverId, FuelLevel, TripPatch, VehicleId, VehiclePatch, VehicleStatus};
use fleetdesk_store::MutationBatch;

impl Planner<'_> {
    /// InUse -> PendingHandover. The holder's open trip keeps running until
    /// the target accepts.
    pub fn initiate_handover(
        &self,
        vehicle_id: &VehicleId,
        target: &DriverId,
        justification: &str,
    ) -> Result<MutationBatch, CoreError> {
        let vehicle = self.store.vehicle(vehicle_id)?;
        validate_transition(vehicle_id, vehicle.status, VehicleStatus::PendingHandover)?;
        if vehicle.is_held_by(target) {
            return Err(CoreError::SelfHandover {
                vehicle: vehicle_id.to_string(),
                driver: target.to_string(),
            });
        }
        self.store.driver(target)?;

        let mut batch = MutationBatch::new();
        batch.patch_vehicle(
            vehicle_id.clone(),
            VehiclePatch {
                status: Some(VehicleStatus::PendingHandover),
                handover_to_driver_id: Some(Some(target.clone())),
                handover_justification: Some(Some(justification.trim().to_owned())),
                ..VehiclePatch::default()
            },
        );
        Ok(batch)
    }

    /// PendingHandover -> InUse under the target driver. Closes the outgoing
    /// trip at the handover reading and opens the target's trip from it.
    pub fn accept_handover(
        &self,
        vehicle_id: &VehicleId,
        start_mileage: u64,
        start_fuel_level: FuelLevel,
        destination: &str,
        purpose: &str,
    ) -> Result<MutationBatch, CoreError> {
        let vehicle = self.store.vehicle(vehicle_id)?;
        validate_transition(vehicle_id, vehicle.status, VehicleStatus::InUse)?;
        let target = vehicle.handover_to_driver_id.clone().ok_or_else(|| {
            CoreError::InvalidCommand(format!("vehicle {vehicle_id} has no handover target"))
        })?;
        guard_mileage(vehicle, start_mileage)?;

        let mut batch = MutationBatch::new();
        if let Some(trip) = self.open_trip_or_policy(vehicle_id)? {
            guard_clock(trip, self.now)?;
            batch.patch_trip(
                trip.id.clone(),
                TripPatch::close(self.now, start_mileage, Some(start_fuel_level)),
            );
        }
        batch
            .create_trip(self.new_trip(
                vehicle_id,
                &target,
                start_mileage,
                start_fuel_level,
                vehicle.location.clone(),
                destination,
                purpose,
            ))
            .patch_vehicle(
                vehicle_id.clone(),
                VehiclePatch {
                    status: Some(VehicleStatus::InUse),
                    current_driver_id: Some(Some(target)),
                    mileage: Some(start_mileage),
                    fuel_level: Some(start_fuel_level),
                    handover_to_driver_id: Some(None),
                    handover_justification: Some(None),
                },
            );
        Ok(batch)
    }

    /// PendingHandover -> InUse under the same driver; the proposal is dropped.
    pub fn reject_handover(&self, vehicle_id: &VehicleId) -> Result<MutationBatch, CoreError> {
        let vehicle = self.store.vehicle(vehicle_id)?;
        validate_transition(vehicle_id, vehicle.status, VehicleStatus::InUse)?;

        let mut batch = MutationBatch::new();
        batch.patch_vehicle(
            vehicle_id.clone(),
            VehiclePatch {
                status: Some(VehicleStatus::InUse),
                handover_to_driver_id: Some(None),
                handover_justification: Some(None),
                ..VehiclePatch::default()
            },
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use crate::command::Command;
    use crate::config::EngineConfig;
    use crate::planner::plan;
    use crate::CoreError;
    use chrono::{DateTime, Utc};
    use fleetdesk_schema::{DriverId, FuelLevel, VehicleId, VehicleStatus};
    use fleetdesk_store::{FleetStore, Mutation, StoreError};

    fn now() -> DateTime<Utc> {
        "2024-08-15T10:00:00Z".parse().unwrap()
    }

    fn initiate(target: &str) -> Command {
        Command::InitiateHandover {
            vehicle: VehicleId::new("CAR-001"),
            target_driver: DriverId::new(target),
            justification: "fim de turno".to_owned(),
        }
    }

    fn pending_store() -> FleetStore {
        let mut store = FleetStore::seeded();
        let batch = plan(&store, &initiate("DRV-002"), now(), &EngineConfig::default()).unwrap();
        store.apply(batch).unwrap();
        store
    }

    #[test]
    fn initiate_sets_pending_fields_only() {
        let store = FleetStore::seeded();
        let batch = plan(&store, &initiate("DRV-002"), now(), &EngineConfig::default()).unwrap();
        assert_eq!(batch.len(), 1);
        match batch.iter().next() {
            Some(Mutation::PatchVehicle { patch, .. }) => {
                assert_eq!(patch.status, Some(VehicleStatus::PendingHandover));
                assert_eq!(
                    patch.handover_to_driver_id,
                    Some(Some(DriverId::new("DRV-002")))
                );
                assert!(patch.current_driver_id.is_none());
            }
            other => panic!("unexpected mutation: {other:?}"),
        }
    }

    #[test]
    fn handover_to_self_rejected() {
        let store = FleetStore::seeded();
        let err = plan(&store, &initiate("DRV-001"), now(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CoreError::SelfHandover { .. }));
    }

    #[test]
    fn handover_to_unknown_driver_rejected() {
        let store = FleetStore::seeded();
        let err = plan(&store, &initiate("DRV-404"), now(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::DriverNotFound(_))));
    }

    #[test]
    fn second_initiate_is_invalid_transition() {
        let store = pending_store();
        let err = plan(&store, &initiate("DRV-003"), now(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn initiate_on_available_vehicle_fails() {
        let store = FleetStore::seeded();
        let cmd = Command::InitiateHandover {
            vehicle: VehicleId::new("VAN-002"),
            target_driver: DriverId::new("DRV-002"),
            justification: "x".to_owned(),
        };
        assert!(matches!(
            plan(&store, &cmd, now(), &EngineConfig::default()),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn accept_closes_and_opens() {
        let store = pending_store();
        let cmd = Command::AcceptHandover {
            vehicle: VehicleId::new("CAR-001"),
            start_mileage: 130_300,
            start_fuel_level: FuelLevel::ThreeQuarters,
            destination: "RJ".to_owned(),
            purpose: "coleta".to_owned(),
        };
        let batch = plan(&store, &cmd, now(), &EngineConfig::default()).unwrap();
        assert_eq!(batch.closed_trips().count(), 1);
        let opened = batch.created_trips().next().unwrap();
        assert_eq!(opened.driver_id, "DRV-002");
        assert_eq!(opened.start_mileage, 130_300);
        assert_eq!(opened.origin.as_deref(), Some("Houston, TX"));
    }

    #[test]
    fn accept_without_pending_handover_fails() {
        let store = FleetStore::seeded();
        let cmd = Command::AcceptHandover {
            vehicle: VehicleId::new("CAR-001"),
            start_mileage: 130_300,
            start_fuel_level: FuelLevel::Half,
            destination: "RJ".to_owned(),
            purpose: "coleta".to_owned(),
        };
        assert!(matches!(
            plan(&store, &cmd, now(), &EngineConfig::default()),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn reject_only_clears_proposal() {
        let store = pending_store();
        let cmd = Command::RejectHandover {
            vehicle: VehicleId::new("CAR-001"),
        };
        let batch = plan(&store, &cmd, now(), &EngineConfig::default()).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.created_trips().count(), 0);
        assert_eq!(batch.closed_trips().count(), 0);
    }

    #[test]
    fn reject_on_in_use_vehicle_fails() {
        let store = FleetStore::seeded();
        let cmd = Command::RejectHandover {
            vehicle: VehicleId::new("CAR-001"),
        };
        let err = plan(&store, &cmd, now(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }
}
