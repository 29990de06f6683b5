use super::EXIT_SUCCESS;
use fleetdesk_core::Engine;

pub fn run(engine: &Engine) -> Result<u8, String> {
    let snapshot = engine.store().to_snapshot(engine.clock().now());
    println!("{}", snapshot.to_json().map_err(|e| e.to_string())?);
    Ok(EXIT_SUCCESS)
}
