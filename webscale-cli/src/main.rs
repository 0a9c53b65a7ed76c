use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;

use cli::{Args, Mode};

const LOG_FILE_NAME: &str = "webscale.log";

fn log_file_appender(log_dir: &Path) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
        .with_context(|| format!("Failed to open {} in {}", LOG_FILE_NAME, log_dir.display()))
}

/// Initialize tracing to a log file so stdout stays clean for rendered output.
///
/// When the log file cannot be opened the command still runs, without file
/// logging. The returned guard flushes buffered log lines when dropped; keep
/// it alive until the command finishes.
fn initialize_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,webscale_cli=debug,webscale_stack=debug".into());

    let (file_layer, guard) = match log_file_appender(log_dir) {
        Ok(appender) => {
            let (file_writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(file_writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("⚠ {e:#}; continuing without a log file");
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Loads .env as well
    let config = config::Config::load()?;
    let _guard = initialize_tracing(&config.log_dir);

    match args.mode {
        Mode::Render {
            stack,
            variant,
            format,
            out,
        } => commands::program::run_render(&config, stack, variant, format, out),
        Mode::Config {
            stack,
            show_secrets,
        } => commands::stack::run_config(&config, stack, show_secrets),
        Mode::Resources {
            stack,
            variant,
            output,
        } => commands::program::run_resources(&config, stack, variant, output),
        Mode::Check { stack, variant } => commands::program::run_check(&config, stack, variant),
        Mode::Init { stack, force } => commands::stack::run_init(&config, stack, force),
    }
}
