//! Command Line Config & Logging

use std::path::PathBuf;

use clap::{Args, Parser};
use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Errors raised while setting up the command line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// A global subscriber was already installed.
    #[error("Failed to initialise logging: {0}")]
    Logging(#[from] TryInitError),
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Assign fixture items to fixture categories and report coverage.
#[derive(Debug, Parser)]
#[command(name = "collate", version)]
pub struct CliArgs {
    /// Directory holding `items/` and `categories/` fixture files
    #[arg(long, env = "COLLATE_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Fixture set to load
    #[arg(short, long, default_value = "basic")]
    pub set: String,

    /// Write the assignment as JSON to this path
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Write item ids only, without values
    #[arg(long)]
    pub ids_only: bool,

    /// Write the ILP formulation as a Typst document to this path
    #[arg(long)]
    pub formulation: Option<PathBuf>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` directives take precedence over `--log-level` when they parse.
///
/// # Errors
///
/// Returns [`CliError::Logging`] if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), CliError> {
    match config.log_format {
        LogFormat::Compact => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

fn init_with_layer<L>(config: &LoggingConfig, fmt_layer: L) -> Result<(), CliError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn defaults_apply_without_arguments() -> TestResult {
        let args = CliArgs::try_parse_from(["collate", "--log-level", "info"])?;

        assert_eq!(args.set, "basic");
        assert!(args.out.is_none());
        assert!(!args.ids_only);
        assert_eq!(args.logging.log_level, "info");

        Ok(())
    }

    #[test]
    fn parses_every_option() -> TestResult {
        let args = CliArgs::try_parse_from([
            "collate",
            "--fixtures",
            "/tmp/sets",
            "--set",
            "tight",
            "--out",
            "assignment.json",
            "--ids-only",
            "--formulation",
            "model.typ",
            "--log-format",
            "json",
        ])?;

        assert_eq!(args.fixtures, PathBuf::from("/tmp/sets"));
        assert_eq!(args.set, "tight");
        assert_eq!(args.out, Some(PathBuf::from("assignment.json")));
        assert!(args.ids_only);
        assert_eq!(args.formulation, Some(PathBuf::from("model.typ")));
        assert_eq!(args.logging.log_format, LogFormat::Json);

        Ok(())
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = CliArgs::try_parse_from(["collate", "--log-format", "xml"]);

        assert!(result.is_err());
    }
}
