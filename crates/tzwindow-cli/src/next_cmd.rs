use std::process::ExitCode;

use chrono::Utc;
use serde::Serialize;
use tzwindow_core::{AnchorPoint, FixedLengthSchedule, compute_next_window_start};
use tzwindow_core::schedule::fixed_length_window;

use crate::cli::NextStartArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{
    WindowOutput, parse_hour, parse_rfc3339_to_utc, parse_tz_or_input_error, parse_weekday,
};

#[derive(Debug, Serialize)]
struct NextStartOutput {
    at: String,
    tz: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_start: Option<String>,
    window: WindowOutput,
}

pub fn run_next_start(args: NextStartArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let schedule = FixedLengthSchedule {
        anchor: AnchorPoint::new(
            parse_weekday("anchor_weekday", args.anchor_weekday)?,
            parse_hour("anchor_hour", args.anchor_hour)?,
        ),
        window_length_hours: if args.window_hours > 0 {
            args.window_hours
        } else {
            return Err(CliError::input("window_hours must be positive"));
        },
    };

    let now = match &args.at {
        Some(at) => parse_rfc3339_to_utc(at)?,
        None => Utc::now(),
    };
    let latest_start = args
        .latest_start
        .as_deref()
        .map(parse_rfc3339_to_utc)
        .transpose()?;

    let start = compute_next_window_start(latest_start, now, tz, &schedule);
    let window = fixed_length_window(start, tz, &schedule);
    let output = NextStartOutput {
        at: args.at.clone().unwrap_or_else(|| now.to_rfc3339()),
        tz: tz.to_string(),
        latest_start: args.latest_start.clone(),
        window: WindowOutput::from_definition(&window, tz),
    };

    match output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string(&output)
                .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!(
                "{}: {} to {}",
                output.window.label, output.window.start_local, output.window.end_local
            );
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
