use clap::{Parser, Subcommand};

/// DST-safe recurring submission window scheduler
#[derive(Parser, Debug)]
#[command(name = "tzwindow")]
#[command(about = "DST-safe recurring submission window scheduler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current and next dual-anchor windows for instants
    Schedule(ScheduleArgs),
    /// Show the next fixed-length window start
    NextStart(NextStartArgs),
    /// Materialize windows for all tenants on a polling cadence
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScheduleArgs {
    /// IANA timezone (e.g., America/Chicago)
    #[arg(short, long, default_value = "America/Chicago")]
    pub tz: String,

    /// Night-start weekday: 1 (Monday) through 7 (Sunday)
    #[arg(long, default_value_t = 2)]
    pub night_weekday: u8,

    /// Night-start hour of day (0-23)
    #[arg(long, default_value_t = 12)]
    pub night_hour: u32,

    /// Play-end weekday: 1 (Monday) through 7 (Sunday)
    #[arg(long, default_value_t = 7)]
    pub play_weekday: u8,

    /// Play-end hour of day (0-23)
    #[arg(long, default_value_t = 12)]
    pub play_hour: u32,

    /// Single instant to resolve (RFC3339); overrides --input
    #[arg(long)]
    pub at: Option<String>,

    /// Input file with one RFC3339 instant per line (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct NextStartArgs {
    /// IANA timezone
    #[arg(short, long, default_value = "America/Chicago")]
    pub tz: String,

    /// Anchor weekday: 1 (Monday) through 7 (Sunday)
    #[arg(long, default_value_t = 7)]
    pub anchor_weekday: u8,

    /// Anchor hour of day (0-23)
    #[arg(long, default_value_t = 12)]
    pub anchor_hour: u32,

    /// Window length in hours
    #[arg(long, default_value_t = 168)]
    pub window_hours: u32,

    /// Start of the most recent persisted window (RFC3339), if any
    #[arg(long)]
    pub latest_start: Option<String>,

    /// Instant to resolve from (RFC3339, default now)
    #[arg(long)]
    pub at: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Path to the JSON state file holding tenants and their windows
    #[arg(long)]
    pub state: String,

    /// Seconds between materialization passes
    #[arg(long, default_value_t = 600)]
    pub interval_secs: u64,

    /// Perform a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Output format for the pass summary: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}
