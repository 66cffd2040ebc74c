//! msgstack - replay presentation scripts
//!
//! # Usage
//!
//! ```sh
//! # Run a script file
//! msgstack scripts/demo.json
//!
//! # Read the script from stdin
//! msgstack - < scripts/demo.json
//! ```
//!
//! The run summary is printed to stdout as JSON. Logging goes to stderr and
//! follows `RUST_LOG`.

use std::env;
use std::io::Read;

use anyhow::{bail, Context, Result};
use msgstack::{Runner, Script};

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Respect NO_COLOR environment variable for testing
    let use_ansi = env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_ansi(use_ansi),
        )
        .with(filter)
        .init();
}

fn read_script(path: &str) -> Result<String> {
    if path == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .context("failed to read script from stdin")?;
        return Ok(json);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read script {path}"))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        bail!("usage: msgstack <script.json | ->");
    }

    setup_logging();

    let json = read_script(&args[1])?;
    let script = Script::from_json(&json).with_context(|| format!("invalid script {}", args[1]))?;

    tracing::info!(steps = script.steps.len(), "running script");
    let summary = Runner::new(&script)?.run(&script)?;

    tracing::info!(
        shown = summary.shown.len(),
        dismissed = summary.dismissed,
        pending = summary.pending.len(),
        "script finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
