use super::{colorize_status, driver_label, json_pretty, EXIT_SUCCESS};
use fleetdesk_core::Engine;
use fleetdesk_schema::{DriverId, Vehicle};

/// Which vehicles to list.
#[derive(Debug, Clone)]
pub enum VehicleView {
    All,
    /// Handovers waiting for this driver to accept or reject.
    PendingFor(DriverId),
    /// Handovers this driver proposed.
    PendingBy(DriverId),
}

pub fn run(engine: &Engine, view: &VehicleView, json: bool) -> Result<u8, String> {
    let store = engine.store();
    let vehicles: Vec<&Vehicle> = match view {
        VehicleView::All => store.vehicles().collect(),
        VehicleView::PendingFor(driver) => store.pending_handovers_for(driver).collect(),
        VehicleView::PendingBy(driver) => store.pending_handovers_by(driver).collect(),
    };
    if json {
        println!("{}", json_pretty(&vehicles)?);
    } else if vehicles.is_empty() {
        match view {
            VehicleView::All => println!("no vehicles registered"),
            VehicleView::PendingFor(_) | VehicleView::PendingBy(_) => {
                println!("no pending handovers");
            }
        }
    } else {
        println!(
            "{:<10} {:<10} {:<18} {:<18} {:>9}  DRIVER",
            "ID", "PLATE", "VEHICLE", "STATUS", "KM"
        );
        for v in &vehicles {
            let mut holder = v
                .current_driver_id
                .as_ref()
                .map(|d| driver_label(store, d))
                .unwrap_or_default();
            if let Some(ref target) = v.handover_to_driver_id {
                holder.push_str(&format!(" -> {}", driver_label(store, target)));
            }
            println!(
                "{:<10} {:<10} {:<18} {:<18} {:>9}  {}",
                v.id,
                v.license_plate,
                format!("{} {}", v.brand, v.model),
                colorize_status(v.status),
                v.mileage,
                holder
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
