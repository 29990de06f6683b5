use super::{colorize_status, json_pretty, EXIT_SUCCESS};
use fleetdesk_core::Engine;
use fleetdesk_schema::VehicleStatus;

pub fn run(engine: &Engine, json: bool) -> Result<u8, String> {
    let summary = engine.store().summary();
    if json {
        println!("{}", json_pretty(&summary)?);
    } else {
        println!("vehicles:          {}", summary.total);
        for (status, count) in [
            (VehicleStatus::Available, summary.available),
            (VehicleStatus::InUse, summary.in_use),
            (VehicleStatus::PendingHandover, summary.pending_handover),
            (VehicleStatus::Maintenance, summary.maintenance),
        ] {
            let label = format!("{}:", colorize_status(status));
            println!("  {label:<26} {count}");
        }
    }
    Ok(EXIT_SUCCESS)
}
