//! `x-wr-timezone` CLI: make calendars that use `X-WR-TIMEZONE` RFC 5545 compliant.
//!
//! ## Usage
//!
//! ```sh
//! # Convert stdin to stdout, adding the VTIMEZONE definition
//! curl https://example.com/calendar.ics | x-wr-timezone
//!
//! # Convert a file into another file without adding VTIMEZONE
//! x-wr-timezone --no-timezone in.ics out.ics
//!
//! # Ignore X-WR-TIMEZONE and use another zone
//! x-wr-timezone -z Europe/Berlin in.ics
//!
//! # Show what happens
//! x-wr-timezone -v in.ics out.ics
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use x_wr_timezone::{Converter, TargetZone};

/// Path argument meaning stdin or stdout.
const STDIO: &str = "-";

#[derive(Parser)]
#[command(
    name = "x-wr-timezone",
    version,
    about = "Convert calendars using X-WR-TIMEZONE into standard RFC 5545 calendars"
)]
struct Cli {
    /// Input calendar (reads from stdin if omitted or "-")
    input: Option<String>,

    /// Output file (writes to stdout if omitted or "-")
    output: Option<String>,

    /// Add the VTIMEZONE definition of the target zone (default)
    #[arg(long, overrides_with = "no_timezone")]
    add_timezone: bool,

    /// Do not add a VTIMEZONE definition
    #[arg(long, overrides_with = "add_timezone")]
    no_timezone: bool,

    /// Convert into this zone instead of the one in X-WR-TIMEZONE
    #[arg(short = 'z', long, value_name = "TZ")]
    timezone: Option<String>,

    /// Log what is being converted to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let bytes = read_input(cli.input.as_deref())?;
    let text = std::str::from_utf8(&bytes).context("Input is not valid UTF-8")?;
    let calendar = ics_core::decode(text).context("Failed to parse calendar")?;

    let add_timezone = cli.add_timezone || !cli.no_timezone;
    let zone = cli.timezone.map(TargetZone::from);
    let converted = Converter::new()
        .to_standard(&calendar, zone, add_timezone)
        .context("Failed to convert calendar")?;

    if Arc::ptr_eq(&calendar, &converted) {
        tracing::debug!("calendar unchanged, writing the input back");
        write_output(cli.output.as_deref(), &bytes)?;
    } else {
        write_output(cli.output.as_deref(), ics_core::encode(&converted).as_bytes())?;
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != STDIO => {
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) if path != STDIO => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
