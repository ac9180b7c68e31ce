// ABOUTME: Entry point for the docker-nginx CLI application.
// ABOUTME: Parses arguments, wires the collaborators and dispatches hook events.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use docker_nginx::charm::{
    CONFIG_KEY, CONTENT_KEY, ContentRecord, Controller, HookEvent, STATE_KEY, UnitState,
};
use docker_nginx::config::CharmConfig;
use docker_nginx::error::{Error, Result};
use docker_nginx::fetch::GitFetcher;
use docker_nginx::host::HookTools;
use docker_nginx::output::{Output, OutputMode, StatusReport};
use docker_nginx::runtime::{CliRuntime, RuntimeInfo, RuntimeType, detect_local};
use docker_nginx::store::{self, UnitStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Normal
    });

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let state_file = cli.state_file.unwrap_or_else(store::default_path);

    match cli.command {
        Commands::Hook { name, relation_id } => {
            let name = name.ok_or(Error::MissingHook)?;
            let event = HookEvent::parse(&name, relation_id.as_deref())?;
            let host = HookTools::new();
            let config = load_config(cli.config.as_deref(), &host).await?;
            handle_hook(&event, config, state_file, &host, output).await
        }
        Commands::Status => status(&state_file, output),
    }
}

/// Options from a file when given, otherwise from the host.
async fn load_config(path: Option<&Path>, host: &HookTools) -> Result<CharmConfig> {
    match path {
        Some(path) => Ok(CharmConfig::load(path)?),
        None => {
            let json = host.config_get().await?;
            Ok(CharmConfig::from_json(&json)?)
        }
    }
}

async fn handle_hook(
    event: &HookEvent,
    config: CharmConfig,
    state_file: PathBuf,
    host: &HookTools,
    output: &Output,
) -> Result<()> {
    let store = UnitStore::open(state_file)?;
    let previous: Option<CharmConfig> = store.get(CONFIG_KEY)?;

    let runtime = CliRuntime::new(select_runtime(config.runtime));
    // The container must be stopped by the runtime that started it
    let previous_runtime = previous
        .filter(|previous| previous.runtime != config.runtime)
        .map(|previous| CliRuntime::new(select_runtime(previous.runtime)));
    let fetcher = GitFetcher::new();

    let mut controller = Controller::new(&runtime, host, &fetcher, config, store)?;
    if let Some(previous_runtime) = &previous_runtime {
        controller = controller.with_previous_runtime(previous_runtime);
    }
    controller.dispatch(event).await?;

    for warning in controller.diagnostics().warnings() {
        output.warning(&warning.message);
    }
    output.success(&format!(
        "{} handled, container {}",
        event,
        controller.state().lifecycle
    ));
    Ok(())
}

/// Runtime from the option, local detection, or docker as a last resort.
fn select_runtime(explicit: Option<RuntimeType>) -> RuntimeType {
    let runtime_info = detect_local(explicit).unwrap_or_else(|e| {
        tracing::warn!("{}, falling back to docker", e);
        RuntimeInfo {
            runtime_type: RuntimeType::Docker,
            socket_path: None,
        }
    });
    tracing::debug!(
        "Using {} ({})",
        runtime_info.runtime_type,
        runtime_info.socket_path.as_deref().unwrap_or("configured")
    );
    runtime_info.runtime_type
}

fn status(state_file: &Path, output: &Output) -> Result<()> {
    let store = UnitStore::open(state_file)?;
    let state: UnitState = store.get(STATE_KEY)?.unwrap_or_default();
    let config: Option<CharmConfig> = store.get(CONFIG_KEY)?;
    let content: Option<ContentRecord> = store.get(CONTENT_KEY)?;

    output.report(&StatusReport::new(&state, config.as_ref(), content.as_ref()));
    Ok(())
}
