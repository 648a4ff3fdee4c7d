use liftlog_core::{Config, FileStore, ServiceSettings, WorkoutService};

use liftlog_api::{router, AppState};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    liftlog_core::logging::init_json("info");

    let config = Config::load()?;
    std::fs::create_dir_all(&config.data.data_dir)?;

    let store = FileStore::new(&config.data.data_dir);
    let service = WorkoutService::new(store, ServiceSettings::from(&config));
    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        bind = %config.server.bind,
        data_dir = %config.data.data_dir.display(),
        owner = %config.owner.id,
        "liftlog api listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
