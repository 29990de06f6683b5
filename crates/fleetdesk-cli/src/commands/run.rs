use super::{json_pretty, EXIT_FAILURE, EXIT_SUCCESS};
use crate::commands::act::describe;
use fleetdesk_core::{Engine, Session};
use std::path::Path;

pub fn run(engine: &mut Engine, script: &Path, keep_going: bool, json: bool) -> Result<u8, String> {
    let mut session = Session::load(script).map_err(|e| format!("{e} ({})", script.display()))?;
    session.keep_going |= keep_going;
    let report = session.run(engine);

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        for result in &report.results {
            match (&result.outcome, &result.error) {
                (Some(outcome), _) => println!("{:>3}. {}", result.index + 1, describe(outcome)),
                (None, Some(error)) => {
                    println!("{:>3}. {} FAILED: {error}", result.index + 1, result.command);
                }
                (None, None) => {}
            }
        }
        println!(
            "{} step(s) ok, {} failed, {} skipped",
            report.succeeded(),
            report.failed(),
            report.skipped
        );
    }

    if report.is_success() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILURE)
    }
}
