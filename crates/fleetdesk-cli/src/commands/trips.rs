use super::{json_pretty, EXIT_SUCCESS};
use fleetdesk_core::Engine;
use fleetdesk_store::TripFilter;

pub fn run(
    engine: &Engine,
    vehicle: Option<String>,
    driver: Option<String>,
    open_only: bool,
    json: bool,
) -> Result<u8, String> {
    let filter = TripFilter {
        vehicle,
        driver,
        open_only,
        ..TripFilter::default()
    };
    let trips = engine.store().trip_history(&filter);
    if json {
        println!("{}", json_pretty(&trips)?);
    } else if trips.is_empty() {
        println!("no trips found");
    } else {
        println!(
            "{:<12} {:<10} {:<10} {:<17} {:>9} {:>9}  DESTINATION",
            "TRIP", "VEHICLE", "DRIVER", "STARTED", "START_KM", "END_KM"
        );
        for t in &trips {
            let end = match t.end_mileage {
                Some(km) => km.to_string(),
                None if t.is_paused => "(paused)".to_owned(),
                None => "(open)".to_owned(),
            };
            println!(
                "{:<12} {:<10} {:<10} {:<17} {:>9} {:>9}  {}",
                t.id,
                t.vehicle_id,
                t.driver_id,
                t.start_time.format("%Y-%m-%d %H:%M"),
                t.start_mileage,
                end,
                t.destination
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
