use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::process::ExitCode;

use chrono_tz::Tz;
use serde::Serialize;
use tzwindow_core::{AnchorPoint, DualAnchorSchedule, compute_window_schedule};

use crate::cli::ScheduleArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{
    WindowOutput, parse_hour, parse_rfc3339_to_utc, parse_tz_or_input_error, parse_weekday,
};

#[derive(Debug, Serialize)]
struct ScheduleOutput {
    input: String,
    tz: String,
    current: WindowOutput,
    next: WindowOutput,
}

pub fn run_schedule(args: ScheduleArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let schedule = DualAnchorSchedule {
        night_start: AnchorPoint::new(
            parse_weekday("night_weekday", args.night_weekday)?,
            parse_hour("night_hour", args.night_hour)?,
        ),
        play_end: AnchorPoint::new(
            parse_weekday("play_weekday", args.play_weekday)?,
            parse_hour("play_hour", args.play_hour)?,
        ),
    };

    if schedule.night_start == schedule.play_end {
        return Err(CliError::input(
            "night and play anchors coincide; they must partition the week",
        ));
    }

    if let Some(at) = &args.at {
        emit_schedule(at, tz, &schedule, output_format)?;
        return Ok(ExitCode::from(EXIT_SUCCESS));
    }

    let reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&args.input).map_err(|e| {
            CliError::runtime(format!("Failed to open file '{}': {}", args.input, e))
        })?;
        Box::new(BufReader::new(file))
    };

    for line in reader.lines() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        emit_schedule(trimmed, tz, &schedule, output_format)?;
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn emit_schedule(
    input: &str,
    tz: Tz,
    schedule: &DualAnchorSchedule,
    output_format: OutputFormat,
) -> CliResult<()> {
    let now = parse_rfc3339_to_utc(input)?;
    let windows = compute_window_schedule(now, tz, schedule);
    let output = ScheduleOutput {
        input: input.to_string(),
        tz: tz.to_string(),
        current: WindowOutput::from_definition(&windows.current, tz),
        next: WindowOutput::from_definition(&windows.next, tz),
    };

    match output_format {
        OutputFormat::Json => {
            let json = serde_json::to_string(&output)
                .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!(
                "current: {} {} to {}",
                output.current.label, output.current.start_local, output.current.end_local
            );
            println!(
                "next:    {} {} to {}",
                output.next.label, output.next.start_local, output.next.end_local
            );
        }
    }

    Ok(())
}
