// ============================================================================
// FieldOps Server - Binary Entry Point
// File: crates/fieldops-server/src/main.rs
// ============================================================================

use std::net::SocketAddr;

use tracing::{error, info};

use fieldops_api::{build_router, AppState};
use fieldops_infrastructure::{create_pool, run_migrations};
use fieldops_shared::config::AppConfig;
use fieldops_shared::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize telemetry. The guard flushes buffered file logs on drop.
    let _guard = match &config.app.log_dir {
        Some(dir) => Some(telemetry::init_telemetry_with_file(dir, &config.app.name)),
        None => {
            telemetry::init_telemetry();
            None
        }
    };

    info!("{} starting (env: {})", config.app.name, config.app.env);

    // Connect to database and apply migrations
    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    info!("Database connection established");

    if let Err(e) = run_migrations(&pool).await {
        error!("Migration failed: {e}");
        return Err(e.into());
    }

    // Wire state and routes
    let state = AppState::new(pool, config.clone());
    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
