//! RoomMakeover - budget-aware room makeover planner
//!
//! CLI entry point.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use roommakeover::cli::{Cli, Command, OutputFormat, PlanArgs, generate_after_help, get_log_path};
use roommakeover::config::Config;
use roommakeover::domain::{BudgetConstraint, load_detections};
use roommakeover::inventory::InventoryClassifier;
use roommakeover::llm::{LlmClient, ReplayClient, create_client};
use roommakeover::planning::{MakeoverRequest, MakeoverResponse, Orchestrator};
use roommakeover::prompts::{PromptBuilder, PromptLoader};
use roommakeover::styles::StyleCatalog;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "RoomMakeover loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Styles { format } => cmd_styles(format),
        Command::Prompt { args } => cmd_prompt(&config, &args),
        Command::Plan {
            args,
            response_file,
            format,
        } => {
            let succeeded = cmd_plan(&config, &args, response_file, format).await?;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn prompt_builder() -> Result<PromptBuilder> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(PromptBuilder::new(&PromptLoader::new(cwd)))
}

fn cmd_styles(format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_styles: called");
    let catalog = StyleCatalog::builtin();
    let styles = catalog.list_styles();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&styles)?);
        }
        OutputFormat::Text => {
            for style in styles {
                println!("{} {}", style.name.as_str().bold(), format!("({})", style.name.title()).dimmed());
                println!("  {}", style.tone_description);
                println!("  {} {}", "palette:".cyan(), style.palette.join(", "));
                println!("  {} {}", "materials:".cyan(), style.materials.join(", "));
                println!("  {} {}", "motifs:".cyan(), style.motifs.join(", "));
                println!();
            }
        }
    }
    Ok(())
}

fn cmd_prompt(config: &Config, args: &PlanArgs) -> Result<()> {
    debug!(?args, "cmd_prompt: called");
    let detections = load_detections(&args.detections)?;
    let catalog = StyleCatalog::builtin();
    let style = catalog.get_style(&args.style)?;
    let budget = BudgetConstraint::new(args.budget, &config.budget.limits())?;
    let inventory = InventoryClassifier::new(&config.detection).classify(&detections);

    let prompt = prompt_builder()?.build(&inventory, style, &budget, &args.priorities);
    println!("{}", prompt.instruction);
    Ok(())
}

/// Returns false when planning failed
async fn cmd_plan(
    config: &Config,
    args: &PlanArgs,
    response_file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<bool> {
    debug!(?args, ?response_file, "cmd_plan: called");
    let detections = load_detections(&args.detections)?;

    let client: Arc<dyn LlmClient> = match response_file {
        Some(path) => {
            info!(path = %path.display(), "Replaying saved model response");
            Arc::new(ReplayClient::new(path))
        }
        None => create_client(&config.llm).context("Failed to create LLM client")?,
    };

    let orchestrator = Orchestrator::new(config, Arc::new(StyleCatalog::builtin()), prompt_builder()?, client);
    let request = MakeoverRequest::new(detections, args.style.clone(), args.budget)
        .with_priorities(args.priorities.clone());

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling request");
                cancel.cancel();
            }
        })
    };

    let outcome = orchestrator.run(request, cancel).await;
    ctrl_c.abort();

    let succeeded = !outcome.is_failure();
    let response = MakeoverResponse::from(outcome);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => print_plan_text(&response),
    }
    Ok(succeeded)
}

fn print_plan_text(response: &MakeoverResponse) {
    let status = match response.status {
        "success" => response.status.green().bold(),
        "partial_success" => response.status.yellow().bold(),
        _ => response.status.red().bold(),
    };
    println!("Status: {}", status);

    if let Some(plan) = &response.plan {
        let currency = plan.budget().currency();
        println!(
            "{} {} {}",
            plan.room_type().title().bold(),
            plan.style().title(),
            format!("(budget {})", plan.budget().display()).dimmed()
        );
        if !plan.room_description().is_empty() {
            println!("{}", plan.room_description());
        }
        println!();

        for (index, planned) in plan.items().iter().enumerate() {
            let item = &planned.item;
            let category = item.category.map(|c| format!(" [{}]", c.as_str())).unwrap_or_default();
            println!(
                "{:>2}. {}  {}{}",
                index + 1,
                item.name.bold(),
                currency.format(item.estimated_price).green(),
                category.dimmed()
            );
            println!("    {}", item.description);
            for link in &planned.shopping_links {
                println!("    {} {}", format!("{}:", link.platform).cyan(), link.url);
            }
        }

        println!();
        println!(
            "Total {}, remaining {}, confidence {:.2}",
            currency.format(plan.total_price()),
            currency.format(plan.remaining_budget()),
            plan.confidence()
        );
        if !plan.summary().is_empty() {
            println!();
            println!("{}", plan.summary());
        }
        if !plan.styling_tips().is_empty() {
            println!();
            println!("{} {}", "Tips:".bold(), plan.styling_tips());
        }
    }

    for warning in &response.warnings {
        println!("{} {}", "warning:".yellow(), warning);
    }

    if let Some(error) = &response.error {
        println!("{} [{}] at {}: {}", "error:".red().bold(), error.kind, error.stage, error.message);
    }
}
