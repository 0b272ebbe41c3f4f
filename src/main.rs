//! AHP engine HTTP server.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ahp_engine::adapters::{
    api_router, FileJudgmentRepository, InMemoryEventBus, InMemoryHierarchy,
    InMemoryJudgmentRepository, MatrixAppState,
};
use ahp_engine::config::{AppConfig, LogFormat, ServerConfig, StorageBackend};
use ahp_engine::ports::JudgmentRepository;

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    match server.log_format() {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server);

    let repository: Arc<dyn JudgmentRepository> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryJudgmentRepository::new()),
        StorageBackend::File => {
            Arc::new(FileJudgmentRepository::new(&config.storage.data_dir))
        }
    };

    let hierarchy = Arc::new(InMemoryHierarchy::new());
    if let Some(path) = &config.storage.hierarchy_file {
        let root = hierarchy.load_json_file(path).await?;
        info!(root_id = %root, path = %path.display(), "hierarchy loaded");
    }

    let state = MatrixAppState::new(
        repository,
        hierarchy,
        Arc::new(InMemoryEventBus::new()),
        config.engine.priority_engine(),
        config.engine.consistency_validator(),
        config.engine.max_fan_out,
    );
    let app = api_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        backend = ?config.storage.backend,
        threshold = config.engine.consistency_threshold,
        "ahp engine listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
