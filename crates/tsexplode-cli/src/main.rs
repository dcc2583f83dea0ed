//! tsexplode CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};
use miette::GraphicalReportHandler;

use tsexplode_cli::{Args, describe_summary, error_adapter::render_reports};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(args:?; "Parsed arguments");

    match tsexplode_cli::run(&args) {
        Ok(summary) => {
            println!("{}", describe_summary(&summary, &args.out));
            info!(written = summary.written().len(); "Completed successfully");
        }
        Err(err) => {
            for report in render_reports(&err, &GraphicalReportHandler::new()) {
                error!("{report}");
            }
            process::exit(1);
        }
    }
}
