//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::debug;

/// RoomMakeover - budget-aware room makeover planner
#[derive(Parser)]
#[command(
    name = "rmk",
    about = "Plan a room makeover from detected objects, a design style and a budget",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Inputs shared by `prompt` and `plan`
#[derive(Debug, Clone, clap::Args)]
pub struct PlanArgs {
    /// JSON file of detections: a list of {label, confidence} or {"detections": [...]}
    #[arg(short, long, value_name = "FILE")]
    pub detections: PathBuf,

    /// Design style (see `rmk styles`)
    #[arg(short, long)]
    pub style: String,

    /// Budget ceiling in INR
    #[arg(short, long)]
    pub budget: Decimal,

    /// User priority, most important first (repeatable)
    #[arg(short, long = "priority", value_name = "TEXT")]
    pub priorities: Vec<String>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the supported design styles
    Styles {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the model prompt without calling a model
    Prompt {
        #[command(flatten)]
        args: PlanArgs,
    },

    /// Plan a makeover and print the result envelope
    Plan {
        #[command(flatten)]
        args: PlanArgs,

        /// Replay a saved model response instead of calling the provider
        #[arg(short, long, value_name = "FILE")]
        response_file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roommakeover")
        .join("logs")
        .join("roommakeover.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text
pub fn generate_after_help() -> String {
    format!("Logs are written to: {}\n", get_log_path().display())
}

/// Output format for styles/plan commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => {
                debug!("OutputFormat::from_str: matched Text");
                Ok(Self::Text)
            }
            "json" => {
                debug!("OutputFormat::from_str: matched Json");
                Ok(Self::Json)
            }
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use text or json", s))
            }
        }
    }
}
