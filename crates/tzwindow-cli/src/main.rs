use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod error;
mod next_cmd;
mod run_cmd;
mod schedule_cmd;
mod shared;
mod state;

use cli::{Cli, Commands};
use error::{output_format_hint, parse_output_format, render_error};
use next_cmd::run_next_start;
use run_cmd::run_poll;
use schedule_cmd::run_schedule;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schedule(args) => {
            let fallback = output_format_hint(&args.output_format);
            let output_format = match parse_output_format(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_schedule(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
        Commands::NextStart(args) => {
            let fallback = output_format_hint(&args.output_format);
            let output_format = match parse_output_format(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_next_start(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
        Commands::Run(args) => {
            let fallback = output_format_hint(&args.output_format);
            let output_format = match parse_output_format(&args.output_format) {
                Ok(format) => format,
                Err(err) => return render_error(&err, fallback),
            };

            match run_poll(args, output_format) {
                Ok(code) => code,
                Err(err) => render_error(&err, output_format),
            }
        }
    }
}
