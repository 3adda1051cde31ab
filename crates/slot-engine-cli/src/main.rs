//! `slots` CLI: list and explain bookable appointment slots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable 60-minute slots on a day, appointments from stdin
//! echo '[{"startTime":"2026-03-16T09:00:00","durationMinutes":60}]' \
//!   | slots compute --day 2026-03-16 --duration 60
//!
//! # Appointments from a file, detailed JSON output, pinned clock
//! slots compute --day 2026-03-16 -i booked.json --now 2026-03-16T14:47 --detailed
//!
//! # Window, grid and capacity from a config file plus overrides
//! slots --config slots.json compute --day 2026-03-16 -i booked.json --capacity 2
//!
//! # Why is 09:30 not offered?
//! slots explain --day 2026-03-16 --at 09:30 -i booked.json
//! ```
//!
//! Diagnostics (skipped records, defaulted durations) are logged to stderr;
//! set `RUST_LOG=slot_engine=debug` to see every candidate decision.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use slot_engine::{
    appointments_from_json, explain_slot, find_available_slots, parse_day, parse_timestamp, Clock,
    FixedClock, SlotConfig, SlotExplanation, SystemClock,
};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slots", version, about = "Appointment slot availability CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with capacity, window and grid settings
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slot start times for a day
    Compute {
        #[command(flatten)]
        slot: SlotArgs,
        /// Print start, end and overlap count per slot as JSON
        #[arg(long)]
        detailed: bool,
    },
    /// Explain whether one start time is bookable and what collides with it
    Explain {
        #[command(flatten)]
        slot: SlotArgs,
        /// Start time to explain (HH:MM)
        #[arg(long)]
        at: String,
        /// Print the explanation as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SlotArgs {
    /// Day to evaluate (YYYY-MM-DD)
    #[arg(long)]
    day: String,
    /// Appointments JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Service duration in minutes (missing or non-positive means the default)
    #[arg(long, allow_negative_numbers = true)]
    duration: Option<i64>,
    /// Current time (YYYY-MM-DDTHH:MM[:SS]); defaults to the local clock
    #[arg(long)]
    now: Option<String>,
    /// Maximum simultaneous appointments
    #[arg(long)]
    capacity: Option<u32>,
    /// First hour of the working window
    #[arg(long)]
    start_hour: Option<u32>,
    /// Hour the working window closes
    #[arg(long)]
    end_hour: Option<u32>,
    /// Minutes between candidate start times
    #[arg(long)]
    interval: Option<u32>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let base_config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Compute { slot, detailed } => {
            let request = SlotRequest::from_args(&slot, base_config)?;
            let slots = find_available_slots(
                Some(request.day),
                Some(request.appointments.as_slice()),
                request.duration,
                &request.config,
                request.clock.as_ref(),
            );

            if detailed {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    println!("{}", slot.label());
                }
            }
        }
        Commands::Explain { slot, at, json } => {
            let request = SlotRequest::from_args(&slot, base_config)?;
            let at = NaiveTime::parse_from_str(at.trim(), "%H:%M")
                .with_context(|| format!("Invalid --at time: '{}' (expected HH:MM)", at))?;
            let explanation = explain_slot(
                request.day,
                at,
                &request.appointments,
                request.duration,
                &request.config,
                request.clock.as_ref(),
            )
            .context("Failed to explain slot")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&explanation)?);
            } else {
                print_explanation(&explanation);
            }
        }
    }

    Ok(())
}

/// Everything a subcommand needs, resolved from the command line.
struct SlotRequest {
    day: NaiveDate,
    appointments: Vec<slot_engine::ExistingAppointment>,
    duration: Option<i64>,
    config: SlotConfig,
    clock: Box<dyn Clock>,
}

impl SlotRequest {
    fn from_args(args: &SlotArgs, base_config: SlotConfig) -> Result<Self> {
        let day = parse_day(&args.day)
            .with_context(|| format!("Invalid --day: '{}' (expected YYYY-MM-DD)", args.day))?;

        let clock: Box<dyn Clock> = match args.now.as_deref() {
            Some(raw) => {
                let now = parse_timestamp(raw)
                    .with_context(|| format!("Invalid --now: '{}' (expected YYYY-MM-DDTHH:MM[:SS])", raw))?;
                Box::new(FixedClock(now))
            }
            None => Box::new(SystemClock),
        };

        let config = apply_overrides(base_config, args);
        config.validate().context("Invalid slot configuration")?;

        let raw = read_input(args.input.as_deref())?;
        let payload = parse_payload(&raw)?;
        let appointments = appointments_from_json(&payload);
        debug!(%day, ?config, appointments = appointments.len(), "resolved slot request");

        Ok(Self {
            day,
            appointments,
            duration: args.duration,
            config,
            clock,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<SlotConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            SlotConfig::from_json_str(&json)
                .with_context(|| format!("Invalid config file: {}", path))
        }
        None => Ok(SlotConfig::default()),
    }
}

fn apply_overrides(mut config: SlotConfig, args: &SlotArgs) -> SlotConfig {
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if let Some(start_hour) = args.start_hour {
        config.start_hour = start_hour;
    }
    if let Some(end_hour) = args.end_hour {
        config.end_hour = end_hour;
    }
    if let Some(interval) = args.interval {
        config.slot_interval_minutes = interval;
    }
    config
}

/// Blank input means no appointments; anything else must be JSON.
fn parse_payload(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(raw).context("Failed to parse appointments JSON")
}

fn print_explanation(explanation: &SlotExplanation) {
    println!(
        "{}-{} {} ({} of capacity {})",
        explanation.slot.start.format("%H:%M"),
        explanation.slot.end.format("%H:%M"),
        explanation.status.as_str(),
        explanation.overlaps.len(),
        explanation.capacity
    );
    for overlap in &explanation.overlaps {
        println!(
            "  {} - {} overlaps {} min",
            overlap.busy.start.format("%Y-%m-%dT%H:%M"),
            overlap.busy.end.format("%Y-%m-%dT%H:%M"),
            overlap.overlap_minutes
        );
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
