//! Lifecycle engine for fleetdesk vehicles.
//!
//! This crate turns driver actions into atomic store mutations: the
//! `lifecycle` state table, the checkout/check-in and handover planners, the
//! closed `Command` enum validated at the boundary, and the `Engine` that
//! plans a command against a `FleetStore` and applies the resulting batch
//! all-or-nothing. `Session` replays TOML scripts of commands.

pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod handover;
pub mod lifecycle;
pub mod planner;
pub mod session;

pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{ChecklistConfirmation, Command};
pub use config::{EngineConfig, MissingTripPolicy};
pub use engine::{Engine, Outcome};
pub use lifecycle::validate_transition;
pub use planner::plan;
pub use session::{Session, SessionReport, Step, StepResult};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("vehicle {vehicle}: invalid state transition: {from} -> {to}")]
    InvalidTransition {
        vehicle: String,
        from: String,
        to: String,
    },
    #[error("vehicle {0} has no open trip")]
    NoActiveTrip(String),
    #[error("driver {driver} already holds vehicle {vehicle}")]
    SelfHandover { vehicle: String, driver: String },
    #[error("vehicle {vehicle}: reported mileage {reported} is below current mileage {current}")]
    MileageRegression {
        vehicle: String,
        current: u64,
        reported: u64,
    },
    #[error("trip {trip}: closing time {at} is before its start {started}")]
    ClockRegression {
        trip: String,
        started: String,
        at: String,
    },
    #[error("invalid command: {0}")]
    InvalidCommand(String),
    #[error("safety checklist incomplete, unconfirmed: {}", .0.join(", "))]
    IncompleteChecklist(Vec<String>),
    #[error("store error: {0}")]
    Store(#[from] fleetdesk_store::StoreError),
    #[error("config error: {0}")]
    Config(String),
    #[error("script error: {0}")]
    Script(#[from] toml::de::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
