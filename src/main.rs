//! Entry point for the batch converter.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments (an optional config path).
//! - Load configuration from `conf/config.toml`.
//! - Run the conversion batch and log its summary.

mod books;
mod config;
mod convert;
mod pipeline;
mod segmenter;

use crate::config::load_config;
use crate::convert::RtfConverter;
use crate::pipeline::run_batch;
use anyhow::{Result, anyhow};
use std::env;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const DEFAULT_CONFIG_PATH: &str = "conf/config.toml";

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let config_path = parse_args()?;
    let config = load_config(&config_path);
    set_log_level(reload_handle, config.logging.log_level.as_filter_str());
    info!(
        input = %config.input.dir,
        output = %config.output.dir,
        level = %config.logging.log_level,
        "Starting batch conversion"
    );

    let converter = RtfConverter::new(&config.input.encoding);
    let summary = run_batch(&config, &converter)?;
    info!(
        processed = summary.processed,
        skipped_existing = summary.skipped_existing,
        skipped_unmapped = summary.skipped_unmapped,
        failed = summary.failed,
        "Batch finished"
    );
    Ok(())
}

fn parse_args() -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    if args.next().is_some() {
        return Err(anyhow!("Usage: versemill [path-to-config]"));
    }
    Ok(PathBuf::from(path))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
