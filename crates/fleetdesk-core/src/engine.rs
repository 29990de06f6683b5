use crate::clock::{Clock, SystemClock};
use crate::command::{ChecklistConfirmation, Command};
use crate::config::EngineConfig;
use crate::planner::Planner;
use crate::CoreError;
use fleetdesk_schema::{DriverId, FuelLevel, TripId, VehicleId, VehicleStatus};
use fleetdesk_store::FleetStore;
use serde::Serialize;
use tracing::{debug, info};

/// What a command did to its vehicle.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Outcome {
    pub action: &'static str,
    pub vehicle: VehicleId,
    pub previous_status: VehicleStatus,
    pub status: VehicleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_trip: Option<TripId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_trip: Option<TripId>,
    /// Pause state of the open trip after a pause toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
}

/// Executes commands against an owned fleet store.
///
/// Each command is planned against the current state and applied as one
/// batch; on error the store is unchanged.
pub struct Engine {
    store: FleetStore,
    config: EngineConfig,
    clock: Box<dyn Clock>,
}

impl Engine {
    pub fn new(store: FleetStore, config: EngineConfig) -> Self {
        Self::with_clock(store, config, Box::new(SystemClock))
    }

    pub fn with_clock(store: FleetStore, config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    pub fn store(&self) -> &FleetStore {
        &self.store
    }

    /// Direct access for CRUD and bookkeeping records. Lifecycle changes
    /// should go through [`Engine::execute`].
    pub fn store_mut(&mut self) -> &mut FleetStore {
        &mut self.store
    }

    pub fn into_store(self) -> FleetStore {
        self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Validate, plan and apply one command.
    pub fn execute(&mut self, command: &Command) -> Result<Outcome, CoreError> {
        command.validate()?;
        let vehicle_id = command.vehicle();
        let previous_status = self.store.vehicle(vehicle_id)?.status;
        let now = self.clock.now();

        let batch = Planner::new(&self.store, &self.config, now).plan(command)?;
        let opened_trip = batch.created_trips().next().map(|t| t.id.clone());
        let closed_trip = batch.closed_trips().next().cloned();
        let toggled = matches!(command, Command::TogglePause { .. }) && !batch.is_empty();

        self.store.apply(batch)?;

        let status = self.store.vehicle(vehicle_id)?.status;
        let paused = if toggled {
            self.store.open_trip_for(vehicle_id).map(|t| t.is_paused)
        } else {
            None
        };
        if previous_status == status {
            debug!("{command}: status unchanged ({status})");
        } else {
            info!("{command}: {previous_status} -> {status}");
        }

        Ok(Outcome {
            action: command.action(),
            vehicle: vehicle_id.clone(),
            previous_status,
            status,
            opened_trip,
            closed_trip,
            paused,
        })
    }

    /// Like [`Engine::execute`], but first requires the configured safety
    /// checklist for checkout, check-in and handover acceptance.
    pub fn execute_checked(
        &mut self,
        command: &Command,
        checklist: &ChecklistConfirmation,
    ) -> Result<Outcome, CoreError> {
        if self.config.require_checklist && command.needs_checklist() {
            let missing = checklist.missing(&self.config.checklist);
            if !missing.is_empty() {
                return Err(CoreError::IncompleteChecklist(missing));
            }
        }
        self.execute(command)
    }

    pub fn check_out(
        &mut self,
        vehicle: &str,
        driver: &str,
        start_mileage: u64,
        start_fuel_level: FuelLevel,
        destination: &str,
        purpose: &str,
    ) -> Result<Outcome, CoreError> {
        self.execute(&Command::CheckOut {
            vehicle: VehicleId::new(vehicle),
            driver: DriverId::new(driver),
            start_mileage,
            start_fuel_level,
            destination: destination.to_owned(),
            purpose: purpose.to_owned(),
        })
    }

    pub fn check_in(
        &mut self,
        vehicle: &str,
        end_mileage: u64,
        end_fuel_level: FuelLevel,
    ) -> Result<Outcome, CoreError> {
        self.execute(&Command::CheckIn {
            vehicle: VehicleId::new(vehicle),
            end_mileage,
            end_fuel_level,
        })
    }

    pub fn initiate_handover(
        &mut self,
        vehicle: &str,
        target_driver: &str,
        justification: &str,
    ) -> Result<Outcome, CoreError> {
        self.execute(&Command::InitiateHandover {
            vehicle: VehicleId::new(vehicle),
            target_driver: DriverId::new(target_driver),
            justification: justification.to_owned(),
        })
    }

    pub fn accept_handover(
        &mut self,
        vehicle: &str,
        start_mileage: u64,
        start_fuel_level: FuelLevel,
        destination: &str,
        purpose: &str,
    ) -> Result<Outcome, CoreError> {
        self.execute(&Command::AcceptHandover {
            vehicle: VehicleId::new(vehicle),
            start_mileage,
            start_fuel_level,
            destination: destination.to_owned(),
            purpose: purpose.to_owned(),
        })
    }

    pub fn reject_handover(&mut self, vehicle: &str) -> Result<Outcome, CoreError> {
        self.execute(&Command::RejectHandover {
            vehicle: VehicleId::new(vehicle),
        })
    }

    pub fn toggle_trip_pause(&mut self, vehicle: &str) -> Result<Outcome, CoreError> {
        self.execute(&Command::TogglePause {
            vehicle: VehicleId::new(vehicle),
        })
    }
}
