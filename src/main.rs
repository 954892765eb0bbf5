use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ara_template_fetcher::config::Settings;
use ara_template_fetcher::error::AppError;
use ara_template_fetcher::template::{TemplateContent, TemplateDescriptor, TemplateFetcher};

/// Fetch notification templates from S3 and render them.
#[derive(Debug, Parser)]
#[command(name = "template-fetcher", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Parse payloads as {"subject", "body"} JSON regardless of settings
    #[arg(long, global = true)]
    structured: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "LOG_JSON")]
    log_json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a template as stored
    Raw(TemplateArgs),

    /// Print a template with variables substituted
    Interpolate {
        #[command(flatten)]
        template: TemplateArgs,

        /// Variables as a JSON object
        #[arg(long, default_value = "{}")]
        data: String,
    },
}

#[derive(Debug, Args)]
struct TemplateArgs {
    #[arg(long)]
    entity: String,
    #[arg(long)]
    entity_id: String,
    #[arg(long)]
    category: String,
    #[arg(long = "type", value_name = "TYPE")]
    kind: String,
    #[arg(long)]
    language: String,
}

impl From<TemplateArgs> for TemplateDescriptor {
    fn from(args: TemplateArgs) -> Self {
        TemplateDescriptor::new(
            args.entity,
            args.entity_id,
            args.category,
            args.kind,
            args.language,
        )
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(app_err) => eprintln!("{}: {}", app_err.code(), app_err.message()),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::from(exit_status(&err))
        }
    }
}

/// 2 when the caller supplied bad input, 1 for everything else.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AppError>() {
        Some(app_err) if app_err.is_caller_error() => 2,
        _ => 1,
    }
}

/// Command-line flags layered on top of loaded settings.
fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    settings.template.structured |= cli.structured;
}

/// Raw templates print as-is; structured ones as pretty JSON.
fn format_content(content: &TemplateContent) -> serde_json::Result<String> {
    match content {
        TemplateContent::Raw(text) => Ok(text.clone()),
        structured => serde_json::to_string_pretty(structured),
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut settings = Settings::new().map_err(AppError::from)?;
    apply_overrides(&mut settings, &cli);
    tracing::debug!("Configuration loaded");

    let config = settings.fetcher_config()?;
    let fetcher = TemplateFetcher::connect(config).await;

    let content = match cli.command {
        Command::Raw(args) => fetcher.raw(&args.into()).await?,
        Command::Interpolate { template, data } => {
            let data: serde_json::Value =
                serde_json::from_str(&data).context("--data must be valid JSON")?;
            fetcher.interpolate(&template.into(), &data).await?
        }
    };

    println!("{}", format_content(&content)?);

    Ok(())
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so stdout carries only the template
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
