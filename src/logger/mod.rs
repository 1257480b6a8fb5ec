//! Logger built on `tracing-subscriber`
//!
//! Supports:
//! - Console output with color control
//! - File output in Full, Compact or JSON format
//! - Falling back to stderr when the log file stops accepting writes

pub mod config;
pub mod error;
pub(crate) mod writer;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::FileWriter;

/// Initialize the global subscriber with the given configuration
///
/// `RUST_LOG` is not consulted; the configured level string is parsed as an
/// `EnvFilter` directive, so `info,arena_users=debug` works too.
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    match (config.console.enabled, config.file.enabled) {
        (true, true) => init_both(&config, filter)?,
        (true, false) => init_console_only(&config.console, filter)?,
        (false, true) => init_file_only(&config.file, filter)?,
        (false, false) => return Err(LoggerError::NoOutput.into()),
    }

    Ok(())
}

fn init_console_only(config: &ConsoleConfig, filter: EnvFilter) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer(config))
        .try_init()?;
    Ok(())
}

fn console_layer<S>(config: &ConsoleConfig) -> fmt::Layer<S> {
    let use_ansi = config.colored && std::io::stdout().is_terminal();
    fmt::layer()
        .with_ansi(use_ansi)
        .with_target(true)
        .with_level(true)
}

fn init_file_only(config: &FileConfig, filter: EnvFilter) -> anyhow::Result<()> {
    let writer = FileWriter::new(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Full => registry
            .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
            .try_init()?,
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .compact()
                    .with_writer(writer),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().with_ansi(false).json().with_writer(writer))
            .try_init()?,
    }

    Ok(())
}

fn init_both(config: &LoggerConfig, filter: EnvFilter) -> anyhow::Result<()> {
    both_subscriber(config, filter)?.try_init()?;
    Ok(())
}

/// Console plus file subscriber, not yet installed.
///
/// The file layer goes first, otherwise ANSI codes from span fields formatted
/// by the console layer leak into the file.
/// See: https://github.com/tokio-rs/tracing/issues/1817
fn both_subscriber(
    config: &LoggerConfig,
    filter: EnvFilter,
) -> anyhow::Result<Box<dyn Subscriber + Send + Sync>> {
    let writer = FileWriter::new(&config.file)?;
    let registry = tracing_subscriber::registry().with(filter);

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.file.format {
        LogFormat::Full => Box::new(
            registry
                .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
                .with(console_layer(&config.console)),
        ),
        LogFormat::Compact => Box::new(
            registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .compact()
                        .with_writer(writer),
                )
                .with(console_layer(&config.console)),
        ),
        LogFormat::Json => Box::new(
            registry
                .with(fmt::layer().with_ansi(false).json().with_writer(writer))
                .with(console_layer(&config.console)),
        ),
    };

    Ok(subscriber)
}
