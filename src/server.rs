//! Service startup: tracing, config checks, component wiring and serving.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use orchestra_api::{ApiServer, AppState};
use orchestra_config::{Config, ConfigError, ConfigValidator, LoggingConfig};
use orchestra_core::{MemoryWorkflowStore, Orchestrator, Scheduler, WorkflowDefinition, WorkflowRecord};

use crate::adapters::{api_config, build_executor, scheduler_options};

/// Initialize console logging, plus daily-rolling files when
/// `logging.file_dir` is set. `RUST_LOG` overrides `logging.level`.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = match &logging.file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(logging.file_prefix.as_str())
                .max_log_files(30)
                .build(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = GUARD.set(guard);
            Some(fmt::layer().with_writer(writer).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    Ok(())
}

/// Log validation warnings; fail on any validation error.
pub(crate) fn check_config(config: &Config) -> Result<(), ConfigError> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("Config warning: {}", warning);
    }
    if result.is_valid() {
        return Ok(());
    }

    for err in &result.errors {
        error!("Config error: {}", err);
    }
    let messages: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
    Err(ConfigError::InvalidFormat(messages.join("; ")))
}

pub(crate) fn build_orchestrator(config: &Config) -> Result<Arc<Orchestrator>, Box<dyn std::error::Error>> {
    let executor = build_executor(&config.executor)?;
    let options = scheduler_options(&config.scheduler);
    info!(
        "Scheduler: executor={:?}, qa_role={}, max_concurrent_tasks={:?}, dependency_failure={:?}",
        config.executor.kind, options.qa_role, options.max_concurrent_tasks, options.dependency_failure
    );

    let scheduler = Scheduler::with_options(Arc::new(MemoryWorkflowStore::new()), executor, options);
    Ok(Arc::new(Orchestrator::new(scheduler)))
}

/// Run the HTTP server until Ctrl+C, then wait for in-flight workflows.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Orchestra v{}", env!("CARGO_PKG_VERSION"));

    let orchestrator = build_orchestrator(&config)?;
    let state = Arc::new(AppState::new(orchestrator.clone()));
    let server = ApiServer::new(api_config(&config), state);

    server.run_with_shutdown(shutdown_signal()).await?;

    let active = orchestrator.active_runs();
    if active > 0 {
        info!("Waiting for {} workflow run(s) to finish", active);
    }
    orchestrator.shutdown().await;
    info!("Orchestra stopped");
    Ok(())
}

/// Run one workflow definition file to completion.
pub(crate) async fn execute_file(
    config: &Config,
    file: &Path,
) -> Result<WorkflowRecord, Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(file).await?;
    let definition: WorkflowDefinition = serde_json::from_str(&content)?;

    let orchestrator = build_orchestrator(config)?;
    let record = orchestrator.execute(definition).await?;
    info!(
        "Workflow {} finished with status {}",
        record.workflow_id, record.status
    );
    Ok(record)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
    }
}
