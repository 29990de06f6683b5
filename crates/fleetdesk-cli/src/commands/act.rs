use super::{colorize_status, json_pretty, Checklist, EXIT_SUCCESS};
use fleetdesk_core::{Command, Engine, Outcome};

pub fn run(
    engine: &mut Engine,
    command: &Command,
    checklist: &Checklist,
    json: bool,
) -> Result<u8, String> {
    let confirmation = checklist.resolve(engine);
    let outcome = engine
        .execute_checked(command, &confirmation)
        .map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&outcome)?);
    } else {
        println!("{}", describe(&outcome));
    }
    Ok(EXIT_SUCCESS)
}

pub fn describe(outcome: &Outcome) -> String {
    let mut line = if outcome.previous_status == outcome.status {
        format!(
            "{} {}: {}",
            outcome.action,
            outcome.vehicle,
            colorize_status(outcome.status)
        )
    } else {
        format!(
            "{} {}: {} -> {}",
            outcome.action,
            outcome.vehicle,
            colorize_status(outcome.previous_status),
            colorize_status(outcome.status)
        )
    };
    if let Some(ref trip) = outcome.closed_trip {
        line.push_str(&format!(", closed {trip}"));
    }
    if let Some(ref trip) = outcome.opened_trip {
        line.push_str(&format!(", opened {trip}"));
    }
    match outcome.paused {
        Some(true) => line.push_str(", trip paused"),
        Some(false) => line.push_str(", trip resumed"),
        None => {}
    }
    line
}
