//! In-memory entity store for fleetdesk.
//!
//! This crate provides the storage layer: `FleetStore` holds the canonical
//! collections (vehicles, drivers, trips, fuel logs, incidents, schedules,
//! messages, users), `MutationBatch` carries a set of vehicle/trip mutations
//! that `FleetStore::apply` stages and commits all-or-nothing,
//! `verify_fleet_integrity` checks the lifecycle invariants, `seed` loads the
//! built-in mock fleet, and `FleetSnapshot` imports/exports a session as
//! checksummed JSON.

pub mod batch;
pub mod integrity;
pub mod queries;
pub mod seed;
pub mod snapshot;
pub mod store;

pub use batch::{Mutation, MutationBatch};
pub use integrity::{verify_fleet_integrity, IntegrityFailure, IntegrityReport};
pub use queries::{FleetSummary, TripFilter};
pub use snapshot::{FleetSnapshot, SNAPSHOT_FORMAT_VERSION};
pub use store::FleetStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("vehicle not found: {0}")]
    VehicleNotFound(String),
    #[error("driver not found: {0}")]
    DriverNotFound(String),
    #[error("trip not found: {0}")]
    TripNotFound(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("vehicle {id} is {status} and cannot be {action}")]
    VehicleBusy {
        id: String,
        status: String,
        action: &'static str,
    },
    #[error("driver {id} is still referenced by vehicle {vehicle}")]
    DriverInUse { id: String, vehicle: String },
    #[error("snapshot checksum mismatch: expected {expected}, got {actual}")]
    IntegrityFailure { expected: String, actual: String },
    #[error("snapshot format version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
