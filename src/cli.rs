//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::env;
use std::path::{Path, PathBuf};

use graphmize::defaults::DEFAULT_LOG_LEVEL;
use graphmize::output::OutputConfig;
use graphmize::settings::Settings;
use graphmize::suggestions;

use crate::commands::{self, CommandContext};

/// Graphmize - visualize the dependencies of kustomize overlays and bases
#[derive(Parser, Debug)]
#[command(name = "graphmize")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Settings file (default is $HOME/.graphmize.yaml)
    #[arg(long, global = true, value_name = "FILE", env = "GRAPHMIZE_CONFIG")]
    config: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN")]
    color: Option<String>,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the kustomize dependency tree
    Tree(commands::tree::TreeArgs),

    /// Print the dependency graph as JSON or YAML
    Export(commands::export::ExportArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let Cli {
            command,
            config,
            color,
            log_level,
        } = self;

        // Completions need neither settings nor logging.
        let command = match command {
            Commands::Completions(args) => return commands::completions::execute(args),
            other => other,
        };

        let settings = load_settings(config.as_deref())?;

        let cli_level = log_level.as_deref().map(parse_log_level).transpose()?;
        let fallback_level =
            parse_log_level(settings.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))?;
        // A logger may already be installed when running under a test harness.
        let _ = logger_builder(cli_level, fallback_level, env::var("RUST_LOG").ok().as_deref())
            .try_init();
        if let Some(origin) = &settings.origin {
            info!("Using settings file {}", origin.display());
        }

        let context = CommandContext {
            output: OutputConfig::resolve(color.as_deref(), settings.color.as_deref())?,
            settings,
        };

        match command {
            Commands::Tree(args) => commands::tree::execute(args, &context),
            Commands::Export(args) => commands::export::execute(args, &context),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(suggestions::settings_not_found(path));
        }
    }
    Settings::load(explicit).map_err(|e| anyhow::anyhow!("Failed to load settings: {}", e))
}

fn parse_log_level(level: &str) -> Result<LevelFilter> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| suggestions::invalid_log_level(level))
}

/// Configure the stderr logger.
///
/// A level given on the command line is final. Otherwise `RUST_LOG`, when
/// set, refines the level from the settings file or the default.
fn logger_builder(
    cli_level: Option<LevelFilter>,
    fallback_level: LevelFilter,
    rust_log: Option<&str>,
) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.format_timestamp(None);
    match cli_level {
        Some(level) => {
            builder.filter_level(level);
        }
        None => {
            builder.filter_level(fallback_level);
            if let Some(filters) = rust_log {
                builder.parse_filters(filters);
            }
        }
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "graphmize",
            "tree",
            "--color",
            "never",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.color.as_deref(), Some("never"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Tree(_)));
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("WARN").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_log_level("off").unwrap(), LevelFilter::Off);
        let error = parse_log_level("loud").unwrap_err().to_string();
        assert!(error.contains("Invalid log level: loud"));
    }

    #[test]
    fn test_cli_log_level_beats_rust_log() {
        let logger = logger_builder(Some(LevelFilter::Debug), LevelFilter::Warn, Some("error")).build();
        assert_eq!(logger.filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_rust_log_refines_settings_level() {
        let logger = logger_builder(None, LevelFilter::Warn, Some("error")).build();
        assert_eq!(logger.filter(), LevelFilter::Error);

        let logger = logger_builder(None, LevelFilter::Info, None).build();
        assert_eq!(logger.filter(), LevelFilter::Info);
    }

    #[test]
    fn test_missing_explicit_settings_file() {
        let error = load_settings(Some(Path::new("/nonexistent/graphmize.yaml")))
            .unwrap_err()
            .to_string();
        assert!(error.contains("Settings file not found"));
    }
}
