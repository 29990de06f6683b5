pub mod act;
pub mod completions;
pub mod export;
pub mod inspect;
pub mod man_pages;
pub mod messages;
pub mod run;
pub mod summary;
pub mod trips;
pub mod vehicles;
pub mod verify;

use fleetdesk_core::{ChecklistConfirmation, Engine};
use fleetdesk_schema::{DriverId, VehicleStatus};
use fleetdesk_store::FleetStore;
use std::path::Path;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_COMMAND: u8 = 2;
pub const EXIT_STORE_ERROR: u8 = 3;

/// Map an error message to the process exit code.
///
/// Rejected commands (illegal transition, malformed input, missing
/// checklist, self-handover, mileage or clock going backwards) exit with 2
/// and leave the session untouched. Store and snapshot failures exit with 3.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.contains("invalid state transition")
        || msg.starts_with("invalid command:")
        || msg.starts_with("safety checklist")
        || msg.contains("already holds vehicle")
        || msg.contains("is below current mileage")
        || msg.contains("is before its start")
    {
        EXIT_INVALID_COMMAND
    } else if msg.starts_with("store error:")
        || msg.starts_with("store I/O error")
        || msg.starts_with("snapshot ")
        || msg.starts_with("invariant violated:")
    {
        EXIT_STORE_ERROR
    } else {
        EXIT_FAILURE
    }
}

/// Checklist confirmation as given on the command line.
#[derive(Debug, Clone)]
pub enum Checklist {
    All,
    Items(Vec<String>),
}

impl Checklist {
    pub fn resolve(&self, engine: &Engine) -> ChecklistConfirmation {
        match self {
            Checklist::All => ChecklistConfirmation::all(engine.config().checklist.clone()),
            Checklist::Items(items) => ChecklistConfirmation::all(items.clone()),
        }
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn colorize_status(status: VehicleStatus) -> String {
    use console::Style;
    let text = status.to_string();
    match status {
        VehicleStatus::Available => Style::new().green().apply_to(text).to_string(),
        VehicleStatus::InUse => Style::new().cyan().bold().apply_to(text).to_string(),
        VehicleStatus::PendingHandover => Style::new().yellow().apply_to(text).to_string(),
        VehicleStatus::Maintenance => Style::new().dim().apply_to(text).to_string(),
    }
}

/// "Name (ID)" for a known driver, the bare id otherwise.
pub fn driver_label(store: &FleetStore, id: &DriverId) -> String {
    match store.driver(id) {
        Ok(driver) => format!("{} ({id})", driver.name),
        Err(_) => id.to_string(),
    }
}

pub fn save_snapshot(engine: &Engine, path: &Path) -> Result<(), String> {
    engine
        .store()
        .to_snapshot(engine.clock().now())
        .write_to_file(path)
        .map_err(|e| format!("{e} ({})", path.display()))
}
