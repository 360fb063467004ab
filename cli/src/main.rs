use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use option_engine_core::{CommandLineParser, OptionRecord};
use option_engine_validation::{
    CommandLineHandler, CommandLineOptionsProvider, EngineConfig, HELP_OPTION, HELP_SHORT_OPTION,
    INFO_OPTION, OptionCatalog, PlatformOptionsProvider, ValidationFailure, ValidationPipeline,
    render_help, render_info,
};
use serde::Serialize;
use tracing::{debug, info};

/// How an accepted command line is printed.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "optcheck", version)]
#[command(about = "Parse and validate a forwarded command line")]
struct Cli {
    /// Engine configuration (YAML) with the reserved prefix and extension providers.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format for an accepted command line.
    #[arg(long, value_enum, default_value = "text")]
    format: CliOutputFormat,
    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
    /// Command line to validate, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

enum RunError {
    /// The forwarded command line was rejected.
    Invalid(ValidationFailure),
    /// The host could not be set up.
    Setup(String),
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    tool: Option<&'a str>,
    options: &'a [OptionRecord],
    validated_at: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli.log_level) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(cli).await {
        Ok(()) => {}
        Err(RunError::Invalid(failure)) => {
            eprintln!("{failure}");
            std::process::exit(1);
        }
        Err(RunError::Setup(err)) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

async fn run(cli: Cli) -> Result<(), RunError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).map_err(|e| {
            RunError::Setup(format!("Failed to load config '{}': {e}", path.display()))
        })?,
        None => EngineConfig::default(),
    };
    let extensions = config
        .extension_providers()
        .map_err(|e| RunError::Setup(e.to_string()))?;
    debug!(extensions = extensions.len(), "Loaded extension providers");

    let parse_result = CommandLineParser::default().parse(cli.args);
    let tool = parse_result
        .tool_name()
        .map(str::to_string)
        .or_else(|| config.tool.clone());

    let system: Vec<Arc<dyn CommandLineOptionsProvider>> =
        vec![Arc::new(PlatformOptionsProvider::new())];
    let catalog = OptionCatalog::resolve(system, extensions, tool.as_deref()).await;

    let mut handler = CommandLineHandler::new(parse_result, catalog);
    handler
        .validate(&ValidationPipeline::new(config.pipeline_config()))
        .await
        .map_err(RunError::Invalid)?;

    let wants = |name: &str| handler.is_option_set(name).unwrap_or(false);
    if wants(HELP_OPTION) || wants(HELP_SHORT_OPTION) {
        print!("{}", render_help(handler.catalog()));
        return Ok(());
    }
    if wants(INFO_OPTION) {
        print!("{}", render_info(handler.catalog()));
        return Ok(());
    }

    let parse_result = handler.parse_result();
    match cli.format {
        CliOutputFormat::Text => {
            println!("Tool: {}", parse_result.tool_name().unwrap_or("(none)"));
            println!("Options:");
            for record in parse_result.options() {
                if record.arguments.is_empty() {
                    println!("  --{}", record.name);
                } else {
                    println!("  --{} {}", record.name, record.arguments.join(" "));
                }
            }
        }
        CliOutputFormat::Json => {
            let report = ValidationReport {
                tool: parse_result.tool_name(),
                options: parse_result.options(),
                validated_at: chrono::Utc::now().to_rfc3339(),
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| RunError::Setup(format!("Failed to serialize output: {e}")))?;
            println!("{json}");
        }
    }
    info!(options = parse_result.options().len(), "Command line accepted");
    Ok(())
}
