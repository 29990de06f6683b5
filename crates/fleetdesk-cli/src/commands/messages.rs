use super::{json_pretty, EXIT_SUCCESS};
use fleetdesk_core::Engine;
use fleetdesk_schema::DriverId;

pub fn run(engine: &Engine, driver: Option<&str>, json: bool) -> Result<u8, String> {
    let driver = driver.map(DriverId::new);
    let now = engine.clock().now();
    let messages = engine.store().active_messages(now, driver.as_ref());
    if json {
        println!("{}", json_pretty(&messages)?);
    } else if messages.is_empty() {
        println!("no active messages");
    } else {
        for m in &messages {
            println!(
                "[{}] {} ({}, until {})",
                m.created_at.format("%Y-%m-%d"),
                m.title,
                m.author,
                m.expires_at.format("%Y-%m-%d")
            );
            println!("    {}", m.content);
        }
    }
    Ok(EXIT_SUCCESS)
}
