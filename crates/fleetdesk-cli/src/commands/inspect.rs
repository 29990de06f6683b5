use super::{colorize_status, driver_label, json_pretty, EXIT_SUCCESS};
use fleetdesk_core::Engine;

pub fn run(engine: &Engine, vehicle_id: &str, json: bool) -> Result<u8, String> {
    let store = engine.store();
    let vehicle = store.vehicle(vehicle_id).map_err(|e| e.to_string())?;
    let open_trip = store.open_trip_for(vehicle_id);

    if json {
        let payload = serde_json::json!({
            "vehicle": vehicle,
            "open_trip": open_trip,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("id:          {}", vehicle.id);
    println!("vehicle:     {}", vehicle.label());
    println!("status:      {}", colorize_status(vehicle.status));
    println!("location:    {}", vehicle.location);
    println!("mileage:     {} km", vehicle.mileage);
    println!("fuel:        {}", vehicle.fuel_level);
    if let Some(ref driver) = vehicle.current_driver_id {
        println!("driver:      {}", driver_label(store, driver));
    }
    if let Some(ref target) = vehicle.handover_to_driver_id {
        println!("handover to: {}", driver_label(store, target));
        if let Some(ref why) = vehicle.handover_justification {
            println!("reason:      {why}");
        }
    }
    match open_trip {
        Some(trip) => {
            let paused = if trip.is_paused { " (paused)" } else { "" };
            println!("open trip:   {}{paused}", trip.id);
            println!(
                "  {} -> {}, {}",
                trip.origin.as_deref().unwrap_or("?"),
                trip.destination,
                trip.purpose
            );
            println!(
                "  since {} at {} km",
                trip.start_time.format("%Y-%m-%d %H:%M"),
                trip.start_mileage
            );
        }
        None => println!("open trip:   (none)"),
    }
    Ok(EXIT_SUCCESS)
}
