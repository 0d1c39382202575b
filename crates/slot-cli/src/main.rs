//! `slots` CLI — view a week of clinic appointments, check open slots, and
//! book new patients through the practice-management provider.
//!
//! ## Usage
//!
//! ```sh
//! # This week's timelines (provider credentials come from the environment or .env)
//! slots week
//!
//! # A later week, as JSON
//! slots week --from 2026-03-09 --json
//!
//! # Validate an open slot and list the start times and durations it offers
//! slots check --start "2026-03-02 10:30" --duration 180
//!
//! # Book a new patient into that slot
//! slots book --start "2026-03-02 10:30" --duration 180 --at 10:30 --length 30 \
//!   --first-name Ada --last-name Lovelace --dob 1990-12-10 \
//!   --email ada@example.com --phone +1234567890 --gender female
//!
//! # Offline: build one day's timeline from a JSON list of bookings
//! echo '[{"start":"2026-03-02 09:30","duration":30}]' | slots timeline --opens 09:00 --closes 22:00
//! ```

mod render;

use std::future::Future;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use slot_engine::{build_day_timeline, Interval, OfficeHours, ScheduleError};
use slot_provider::{
    BookingRequest, Gender, GatewayError, NewPatient, ProviderClient, ProviderConfig,
    SchedulingService, ServiceError,
};
use tracing_subscriber::EnvFilter;

/// Exit status for a request the schedule or the input rejected.
const EXIT_REJECTED: u8 = 2;
/// Exit status when the provider could not be reached or had no office.
const EXIT_UNAVAILABLE: u8 = 3;

#[derive(Parser)]
#[command(name = "slots", version, about = "Clinic appointment timelines and booking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show seven days of booked and free intervals
    Week {
        /// First day to show (past dates start at today)
        #[arg(long, value_parser = parse_from)]
        from: Option<NaiveDateTime>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check that an open slot is bookable and list its choices
    Check {
        /// Slot start, e.g. "2026-03-02 10:30"
        #[arg(long, value_parser = parse_datetime)]
        start: NaiveDateTime,
        /// Slot length in minutes
        #[arg(long)]
        duration: i64,
    },
    /// Create a patient and book an appointment inside an open slot
    Book {
        #[arg(long, value_parser = parse_datetime)]
        start: NaiveDateTime,
        #[arg(long)]
        duration: i64,
        /// Appointment start time within the slot (HH:MM)
        #[arg(long, value_parser = parse_time)]
        at: NaiveTime,
        /// Appointment length in minutes
        #[arg(long)]
        length: i64,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        dob: NaiveDate,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, value_enum)]
        gender: GenderArg,
    },
    /// Build one day's timeline from a JSON list of bookings, without the provider
    Timeline {
        /// Opening time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        opens: NaiveTime,
        /// Closing time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        closes: NaiveTime,
        /// Day to build (defaults to the first booking's date, then today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

/// One entry of the `timeline` input.
#[derive(Deserialize)]
struct BookingInput {
    start: String,
    duration: i64,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_code(&err)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Week { from, json } => block_on(async move {
            let view = service()?.week(from, Local::now().naive_local()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::week(&view));
            }
            Ok(())
        }),
        Commands::Check { start, duration } => block_on(async move {
            let options = service()?.check(start, duration).await?;
            print!("{}", render::options(&options));
            Ok(())
        }),
        Commands::Book {
            start,
            duration,
            at,
            length,
            first_name,
            last_name,
            dob,
            email,
            phone,
            gender,
        } => {
            let request = BookingRequest {
                slot_start: start,
                slot_minutes: duration,
                start_time: at,
                duration_minutes: length,
                patient: NewPatient {
                    first_name,
                    last_name,
                    date_of_birth: dob,
                    email,
                    phone,
                    gender: gender.into(),
                },
            };
            block_on(async move {
                let booked = service()?.book(&request).await?;
                println!(
                    "Booked {} on {} for patient {}",
                    booked.appointment,
                    booked.appointment.start().date(),
                    booked.patient_id
                );
                Ok(())
            })
        }
        Commands::Timeline {
            opens,
            closes,
            date,
            input,
            json,
        } => {
            let raw = read_input(input.as_deref())?;
            let mut bookings = parse_bookings(&raw)?;
            let day = date
                .or_else(|| bookings.first().map(|b| b.start().date()))
                .unwrap_or_else(|| Local::now().date_naive());
            let total = bookings.len();
            bookings.retain(|booking| booking.start().date() == day);
            if bookings.len() < total {
                tracing::warn!(
                    %day,
                    skipped = total - bookings.len(),
                    "ignoring bookings that start on another day"
                );
            }
            let office_hours = OfficeHours::new(day, opens, closes)?;
            let timeline = build_day_timeline(&bookings, &office_hours);
            if json {
                println!("{}", serde_json::to_string_pretty(&timeline)?);
            } else {
                print!("{}", render::day(day, &timeline));
            }
            Ok(())
        }
    }
}

fn block_on<F>(future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(future)
}

/// Scheduling service over the provider configured in the environment.
fn service() -> Result<SchedulingService<ProviderClient>> {
    // A missing .env is fine; the variables may already be exported.
    let _ = dotenvy::dotenv();
    let config = ProviderConfig::from_env().context("Failed to load provider configuration")?;
    let client = ProviderClient::new(config).context("Failed to build provider client")?;
    Ok(SchedulingService::new(client))
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let rejected = || ExitCode::from(EXIT_REJECTED);
    let unavailable = || ExitCode::from(EXIT_UNAVAILABLE);

    if let Some(service) = err.downcast_ref::<ServiceError>() {
        return match service {
            ServiceError::Schedule(_) => rejected(),
            ServiceError::Gateway(gateway) if gateway.is_unavailable() => unavailable(),
            ServiceError::Gateway(_) => ExitCode::FAILURE,
        };
    }
    if err.downcast_ref::<ScheduleError>().is_some() {
        return rejected();
    }
    match err.downcast_ref::<GatewayError>() {
        Some(gateway) if gateway.is_unavailable() => unavailable(),
        _ => ExitCode::FAILURE,
    }
}

fn parse_bookings(raw: &str) -> Result<Vec<Interval>> {
    let inputs: Vec<BookingInput> =
        serde_json::from_str(raw).context("Failed to parse bookings JSON")?;
    inputs
        .iter()
        .map(|input| {
            let start = parse_datetime(&input.start).map_err(anyhow::Error::msg)?;
            Ok(Interval::from_duration(start, input.duration, true)?)
        })
        .collect()
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

fn parse_datetime(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
        .ok_or_else(|| format!("'{raw}' is not a date and time like 2026-03-02 10:30"))
}

/// Accepts a full timestamp or a bare date (midnight).
fn parse_from(raw: &str) -> std::result::Result<NaiveDateTime, String> {
    parse_datetime(raw).or_else(|_| {
        parse_date(raw)?
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("'{raw}' is not a valid date"))
    })
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{raw}' is not a date like 2026-03-02"))
}

fn parse_time(raw: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
        .map_err(|_| format!("'{raw}' is not a time like 09:00"))
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
