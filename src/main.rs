use anyhow::Context;
use duplynx::{
    app_state::AppState,
    config::Config,
    dataset::SeedDataset,
    query::QueryService,
    registry::RegistryStore,
    router::build_router,
    startup,
    views::Views,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duplynx=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(anyhow::Error::msg)?;

    let store = RegistryStore::new();
    let report = startup::seed_registry(&store, &SeedDataset::canonical())
        .context("seeding the registry failed")?;
    startup::ensure_canonical_tenant(&store).context("canonical tenant missing after seeding")?;
    tracing::info!(
        tenants = report.tenants_created,
        machines = report.machines_created,
        review_records = report.review_records_created,
        skipped = report.skipped,
        "Registry seeded"
    );

    if !config.assets_dir.join("app.css").is_file() {
        tracing::warn!(
            "Stylesheet missing at {}; build the CSS bundle before serving the dashboard",
            config.assets_dir.join("app.css").display()
        );
    }

    let views = Views::new().context("compiling page templates failed")?;
    let state = AppState::new(QueryService::new(store), views, config.clone());
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {} failed", addr))?;
    tracing::info!("Starting DupLynx on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("DupLynx stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
