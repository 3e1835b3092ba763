//! Logging initialization

use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{Args, LogFormat};

/// Initialize logging based on CLI arguments.
///
/// Logs go to stderr so stdout only carries command output.
pub fn init(args: &Args) -> Result<()> {
    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // RUST_LOG wins over the flags
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let log_file = match &args.log_file {
        Some(path) => Some(Mutex::new(File::create(path).with_context(|| {
            format!("Failed to create log file: {}", path.display())
        })?)),
        None => None,
    };

    match args.log_format {
        LogFormat::Text => {
            let file_layer =
                log_file.map(|file| fmt::layer().with_ansi(false).with_writer(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(args.verbose >= 2)
                        .with_file(args.verbose >= 3)
                        .with_line_number(args.verbose >= 3),
                )
                .with(file_layer)
                .init();
        }
        LogFormat::Json => {
            let file_layer = log_file.map(|file| fmt::layer().json().with_writer(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .with(file_layer)
                .init();
        }
        LogFormat::Compact => {
            let file_layer =
                log_file.map(|file| fmt::layer().compact().with_ansi(false).with_writer(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(io::stderr))
                .with(file_layer)
                .init();
        }
    }

    Ok(())
}
