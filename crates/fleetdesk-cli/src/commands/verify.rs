use super::{json_pretty, EXIT_STORE_ERROR, EXIT_SUCCESS};
use fleetdesk_core::Engine;
use fleetdesk_store::verify_fleet_integrity;

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let report = verify_fleet_integrity(engine.store());

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        println!(
            "fleet integrity: {}/{} vehicles passed, {} trips checked ({} open)",
            report.vehicles_passed, report.vehicles_checked, report.trips_checked, report.open_trips
        );
        for f in &report.failed {
            println!("  FAIL {}: {}", f.entity, f.reason);
        }
    }

    if report.is_clean() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_STORE_ERROR)
    }
}
