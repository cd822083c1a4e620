mod config;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use config::{load as config_load, validate as config_validate};
use connect_date::{Date, Zone};
use std::io::{self, BufRead, Write};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match config_load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            std::process::exit(1);
        }
    };

    let zone = match config_validate(&config) {
        Ok(zone) => zone,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            std::process::exit(1);
        }
    };

    debug!(
        timezone = %zone,
        timestamps = config.output.timestamps,
        "Effective configuration loaded"
    );

    let values: Vec<String> = std::env::args().skip(1).collect();

    match run(values, &zone, config.output.timestamps) {
        Ok(0) => {}
        Ok(failures) => {
            error!(failures, "Some values could not be decoded");
            std::process::exit(1);
        }
        Err(err) => {
            error!(error = %err, "connect-date failed");
            std::process::exit(1);
        }
    }
}

/// Decode each value (or each stdin line when none are given) and print it.
/// Returns the number of values that failed to decode.
fn run(values: Vec<String>, zone: &Zone, timestamps: bool) -> Result<usize> {
    let values = if values.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("Failed to read values from stdin")?
    } else {
        values
    };

    let mut out = io::stdout().lock();
    let mut failures = 0;

    for value in values.iter().filter(|v| !v.is_empty()) {
        match Date::decode_in(value.as_bytes(), zone) {
            Ok(date) => {
                writeln!(out, "{}", render(&date, timestamps)).context("Failed to write output")?;
            }
            Err(err) => {
                error!(error = %err, value = %value, "Failed to decode date");
                failures += 1;
            }
        }
    }

    Ok(failures)
}

fn render(date: &Date, timestamps: bool) -> String {
    if !timestamps {
        return date.to_string();
    }

    let timestamp = if date.is_unset() {
        None
    } else {
        date.to_timestamp()
    };

    match timestamp {
        Some(ts) => format!("{date}\t{}", ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => format!("{date}\t-"),
    }
}
