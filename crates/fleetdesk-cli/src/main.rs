mod commands;

use clap::{Args, Parser, Subcommand};
use chrono::{DateTime, Utc};
use clap_complete::Shell;
use commands::vehicles::VehicleView;
use commands::Checklist;
use fleetdesk_core::{Command, Engine, EngineConfig, FixedClock};
use fleetdesk_schema::{DriverId, FuelLevel, VehicleId};
use fleetdesk_store::{FleetSnapshot, FleetStore};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "fleetdesk",
    version,
    about = "Fleet vehicle lifecycle: checkouts, check-ins and driver handovers"
)]
struct Cli {
    /// Start from an exported session snapshot instead of the built-in fleet.
    #[arg(long, global = true)]
    snapshot: Option<String>,

    /// Write the session snapshot here after a successful command.
    #[arg(long, global = true)]
    save: Option<String>,

    /// Engine config file (default: ~/.config/fleetdesk/config.json).
    #[arg(long, global = true)]
    config: Option<String>,

    /// Pretend the current time is TIME (RFC 3339), for reproducible sessions.
    #[arg(long, global = true, value_name = "TIME")]
    now: Option<DateTime<Utc>>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct ChecklistArgs {
    /// Confirm every item of the safety checklist.
    #[arg(long, default_value_t = false)]
    confirm_checklist: bool,
    /// Confirm one checklist item (repeatable).
    #[arg(long = "confirm", value_name = "ITEM")]
    confirmed: Vec<String>,
}

impl ChecklistArgs {
    fn into_checklist(self) -> Checklist {
        if self.confirm_checklist {
            Checklist::All
        } else {
            Checklist::Items(self.confirmed)
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List vehicles with their status and holder.
    Vehicles {
        /// Only handovers waiting for this driver to accept or reject.
        #[arg(long, value_name = "DRIVER", conflicts_with = "pending_by")]
        pending_for: Option<String>,
        /// Only handovers proposed by this driver.
        #[arg(long, value_name = "DRIVER")]
        pending_by: Option<String>,
    },
    /// List trips, newest first.
    Trips {
        /// Only trips of this vehicle.
        #[arg(long)]
        vehicle: Option<String>,
        /// Only trips of this driver.
        #[arg(long)]
        driver: Option<String>,
        /// Only trips still open.
        #[arg(long, default_value_t = false)]
        open: bool,
    },
    /// Show one vehicle with its open trip and pending handover.
    Inspect {
        /// Vehicle ID.
        vehicle: String,
    },
    /// Vehicle counts per status.
    Summary,
    /// Show unexpired messages.
    Messages {
        /// Only messages addressed to this driver (or to everyone).
        #[arg(long)]
        driver: Option<String>,
    },
    /// Check a vehicle out to a driver, opening a trip.
    CheckOut {
        /// Vehicle ID.
        vehicle: String,
        /// Driver taking the vehicle.
        #[arg(long)]
        driver: String,
        /// Odometer reading at departure.
        #[arg(long)]
        mileage: u64,
        /// Fuel level at departure (empty, 1/4, 1/2, 3/4, full).
        #[arg(long)]
        fuel: FuelLevel,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        purpose: String,
        #[command(flatten)]
        checklist: ChecklistArgs,
    },
    /// Return a vehicle, closing its open trip.
    CheckIn {
        /// Vehicle ID.
        vehicle: String,
        /// Odometer reading on arrival.
        #[arg(long)]
        mileage: u64,
        /// Fuel level on arrival.
        #[arg(long)]
        fuel: FuelLevel,
        #[command(flatten)]
        checklist: ChecklistArgs,
    },
    /// Offer an in-use vehicle to another driver.
    Handover {
        /// Vehicle ID.
        vehicle: String,
        /// Driver the vehicle is offered to.
        #[arg(long)]
        to: String,
        #[arg(long)]
        justification: String,
    },
    /// Accept a pending handover as the target driver.
    Accept {
        /// Vehicle ID.
        vehicle: String,
        /// Odometer reading at handover.
        #[arg(long)]
        mileage: u64,
        /// Fuel level at handover.
        #[arg(long)]
        fuel: FuelLevel,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        purpose: String,
        #[command(flatten)]
        checklist: ChecklistArgs,
    },
    /// Reject a pending handover; the vehicle stays with its driver.
    Reject {
        /// Vehicle ID.
        vehicle: String,
    },
    /// Pause or resume the open trip of a vehicle.
    Pause {
        /// Vehicle ID.
        vehicle: String,
    },
    /// Execute a TOML session script.
    Run {
        /// Path to the script.
        script: PathBuf,
        /// Continue after a failing step.
        #[arg(long, default_value_t = false)]
        keep_going: bool,
    },
    /// Check the lifecycle invariants of the loaded session.
    Verify,
    /// Print the session snapshot as checksummed JSON.
    Export,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("FLEETDESK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        snapshot,
        save,
        config,
        now,
        json,
        command,
        ..
    } = cli;

    let result = match command {
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
        command => {
            load_engine(config.as_deref(), snapshot.as_deref(), now).and_then(|mut engine| {
                let code = dispatch(&mut engine, command, json)?;
                if let Some(save) = save {
                    commands::save_snapshot(&engine, &expand_tilde(&save))?;
                }
                Ok(code)
            })
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(commands::exit_code_for(&msg))
        }
    }
}

fn load_engine(
    config: Option<&str>,
    snapshot: Option<&str>,
    now: Option<DateTime<Utc>>,
) -> Result<Engine, String> {
    let config = match config {
        Some(path) => EngineConfig::load(&expand_tilde(path)),
        None => EngineConfig::load_default(),
    }
    .map_err(|e| e.to_string())?;

    let store = match snapshot {
        Some(path) => load_snapshot(&expand_tilde(path))?,
        None => FleetStore::seeded(),
    };
    Ok(match now {
        Some(at) => Engine::with_clock(store, config, Box::new(FixedClock(at))),
        None => Engine::new(store, config),
    })
}

fn load_snapshot(path: &Path) -> Result<FleetStore, String> {
    let snapshot = FleetSnapshot::read_from_file(path)
        .map_err(|e| format!("{e} ({})", path.display()))?;
    FleetStore::from_snapshot(snapshot).map_err(|e| e.to_string())
}

fn dispatch(engine: &mut Engine, command: Commands, json: bool) -> Result<u8, String> {
    match command {
        Commands::Vehicles {
            pending_for,
            pending_by,
        } => {
            let view = match (pending_for, pending_by) {
                (Some(driver), _) => VehicleView::PendingFor(DriverId::new(driver)),
                (None, Some(driver)) => VehicleView::PendingBy(DriverId::new(driver)),
                (None, None) => VehicleView::All,
            };
            commands::vehicles::run(engine, &view, json)
        }
        Commands::Trips {
            vehicle,
            driver,
            open,
        } => commands::trips::run(engine, vehicle, driver, open, json),
        Commands::Inspect { vehicle } => commands::inspect::run(engine, &vehicle, json),
        Commands::Summary => commands::summary::run(engine, json),
        Commands::Messages { driver } => commands::messages::run(engine, driver.as_deref(), json),
        Commands::CheckOut {
            vehicle,
            driver,
            mileage,
            fuel,
            destination,
            purpose,
            checklist,
        } => commands::act::run(
            engine,
            &Command::CheckOut {
                vehicle: VehicleId::new(vehicle),
                driver: DriverId::new(driver),
                start_mileage: mileage,
                start_fuel_level: fuel,
                destination,
                purpose,
            },
            &checklist.into_checklist(),
            json,
        ),
        Commands::CheckIn {
            vehicle,
            mileage,
            fuel,
            checklist,
        } => commands::act::run(
            engine,
            &Command::CheckIn {
                vehicle: VehicleId::new(vehicle),
                end_mileage: mileage,
                end_fuel_level: fuel,
            },
            &checklist.into_checklist(),
            json,
        ),
        Commands::Handover {
            vehicle,
            to,
            justification,
        } => commands::act::run(
            engine,
            &Command::InitiateHandover {
                vehicle: VehicleId::new(vehicle),
                target_driver: DriverId::new(to),
                justification,
            },
            &Checklist::Items(Vec::new()),
            json,
        ),
        Commands::Accept {
            vehicle,
            mileage,
            fuel,
            destination,
            purpose,
            checklist,
        } => commands::act::run(
            engine,
            &Command::AcceptHandover {
                vehicle: VehicleId::new(vehicle),
                start_mileage: mileage,
                start_fuel_level: fuel,
                destination,
                purpose,
            },
            &checklist.into_checklist(),
            json,
        ),
        Commands::Reject { vehicle } => commands::act::run(
            engine,
            &Command::RejectHandover {
                vehicle: VehicleId::new(vehicle),
            },
            &Checklist::Items(Vec::new()),
            json,
        ),
        Commands::Pause { vehicle } => commands::act::run(
            engine,
            &Command::TogglePause {
                vehicle: VehicleId::new(vehicle),
            },
            &Checklist::Items(Vec::new()),
            json,
        ),
        Commands::Run { script, keep_going } => {
            commands::run::run(engine, &script, keep_going, json)
        }
        Commands::Verify => commands::verify::run(engine, json),
        Commands::Export => commands::export::run(engine),
        Commands::Completions { .. } | Commands::ManPages { .. } => {
            unreachable!("handled before the engine is loaded")
        }
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
