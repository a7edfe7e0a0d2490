//! Event hosts replay tool.
//!
//! Replays a JSON scenario of assignment intents and prints the resulting form state.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use event_hosts::config::{Config, LogFormat};
use event_hosts::errors::{AppError, ErrorResponse};
use event_hosts::i18n::EnglishText;
use event_hosts::replay::{replay_file, ReplayReport};

fn main() -> ExitCode {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    tracing::info!("Starting event hosts replay");
    tracing::info!("Scenario path: {:?}", config.scenario_path);

    match run(&config) {
        Ok(report) if report.failed_steps() == 0 => ExitCode::SUCCESS,
        Ok(report) => {
            tracing::warn!("{} intents were rejected", report.failed_steps());
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("Replay failed: {}", e);
            let body = ErrorResponse::new(&e, 0);
            if let Ok(json) = serde_json::to_string(&body) {
                println!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<ReplayReport, AppError> {
    let report = replay_file(&config.scenario_path, &EnglishText)?;

    let json = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &config.output_path {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!("Report written to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(report)
}
