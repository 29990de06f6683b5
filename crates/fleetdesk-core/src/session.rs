//! Scripted sessions: an ordered list of commands read from TOML.
//!
//! ```toml
//! keep_going = false
//!
//! [[step]]
//! action = "check-out"
//! vehicle = "TRK-001"
//! driver = "DRV-002"
//! start_mileage = 120500
//! start_fuel_level = "Full"
//! destination = "Campinas"
//! purpose = "Entrega"
//! confirm_checklist = true
//! ```

use crate::command::{ChecklistConfirmation, Command};
use crate::engine::{Engine, Outcome};
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub command: Command,
    /// Checklist items confirmed for this step.
    #[serde(default)]
    pub checklist: ChecklistConfirmation,
    /// Confirm every configured checklist item.
    #[serde(default)]
    pub confirm_checklist: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Continue after a failing step instead of stopping.
    #[serde(default)]
    pub keep_going: bool,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    pub results: Vec<StepResult>,
    /// Steps not run because an earlier one failed.
    pub skipped: usize,
}

impl SessionReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped == 0
    }
}

impl Session {
    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        let session: Session = toml::from_str(content)?;
        for step in &session.steps {
            step.command.validate()?;
        }
        Ok(session)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn run(&self, engine: &mut Engine) -> SessionReport {
        let mut report = SessionReport::default();
        for (index, step) in self.steps.iter().enumerate() {
            let checklist = if step.confirm_checklist {
                ChecklistConfirmation::all(engine.config().checklist.clone())
            } else {
                step.checklist.clone()
            };
            let result = engine.execute_checked(&step.command, &checklist);
            let failed = result.is_err();
            report.results.push(match result {
                Ok(outcome) => StepResult {
                    index,
                    command: step.command.to_string(),
                    outcome: Some(outcome),
                    error: None,
                },
                Err(e) => {
                    warn!("step {} ({}) failed: {e}", index + 1, step.command);
                    StepResult {
                        index,
                        command: step.command.to_string(),
                        outcome: None,
                        error: Some(e.to_string()),
                    }
                }
            });
            if failed && !self.keep_going {
                report.skipped = self.steps.len() - index - 1;
                break;
            }
        }
        info!(
            "session finished: {} ok, {} failed, {} skipped",
            report.succeeded(),
            report.failed(),
            report.skipped
        );
        report
    }
}
