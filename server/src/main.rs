mod config;
mod http;
mod service;

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use platform_chaos::FaultInjector;
use platform_db::{Dataset, FixtureSettings};
use platform_obs::{ObsConfig, init_tracing};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
    service::ApiService,
};

#[derive(Parser, Debug)]
#[command(
    name = "agent-practice-api",
    version,
    about = "Mock HR API with injected latency and faults"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Validate a fixture file (or the built-in sample) and print its counts.
    #[command(name = "fixture:check")]
    FixtureCheck {
        #[arg(long, value_name = "FILE", help = "Fixture file to validate")]
        path: Option<PathBuf>,
    },
    /// Dump the built-in sample dataset as JSON.
    #[command(name = "fixture:print")]
    FixturePrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => {
            let app_config = Arc::new(AppConfig::load()?);
            run_server(cmd, app_config).await
        }
        Command::FixtureCheck { path } => fixture_check(path),
        Command::FixturePrint { output } => fixture_print(output),
    }
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let dataset = config
        .fixture
        .load()
        .context("failed to load fixture dataset")?;
    let injector = FaultInjector::new(config.chaos.clone());
    info!(
        employees = dataset.employee_count(),
        departments = dataset.department_count(),
        projects = dataset.project_count(),
        chaos_enabled = config.chaos.enabled,
        latency_min_ms = config.chaos.latency.min().as_millis() as u64,
        latency_max_ms = config.chaos.latency.max().as_millis() as u64,
        seed = ?config.chaos.seed,
        error_rate_override = ?config.chaos.error_rate_override,
        "dataset loaded"
    );
    let state = AppState {
        service: ApiService::new(Arc::new(dataset), Arc::new(injector)),
        config,
    };
    http::serve(cmd.into(), state).await
}

fn fixture_check(path: Option<PathBuf>) -> Result<()> {
    let dataset = match path {
        Some(path) => {
            let dataset = Dataset::from_json_file(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            dataset.validate().context("fixture failed validation")?;
            dataset
        }
        None => FixtureSettings::from_env()
            .load()
            .context("fixture failed validation")?,
    };
    println!(
        "fixture ok: {} employees, {} departments, {} projects",
        dataset.employee_count(),
        dataset.department_count(),
        dataset.project_count()
    );
    Ok(())
}

fn fixture_print(output: Option<PathBuf>) -> Result<()> {
    let rendered = Dataset::builtin().to_json_pretty()?;
    match output {
        Some(path) => {
            fs::write(&path, rendered + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "fixture written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
