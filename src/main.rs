use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nina::config::{Config, StoreBackend};
use nina::db;
use nina::handlers::{api, fitness, health, journal};
use nina::middleware::IdentityConfig;
use nina::routes;
use nina::services::{FitnessService, ReleaseService};
use nina::store::{MemoryTableStore, SqliteTableStore, TableStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nina=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env();

    // Pick the table store backend
    let store: Option<Arc<dyn TableStore>> = match config.store {
        StoreBackend::Sqlite => {
            tracing::info!("Connecting to database: {}", config.database_url);
            let pool = db::create_pool(&config.database_url)?;
            Some(Arc::new(SqliteTableStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Some(Arc::new(MemoryTableStore::new()))
        }
        StoreBackend::Disabled => {
            tracing::warn!("No store configured; sessions are empty and releases use examples");
            None
        }
    };

    // Create services
    let (fitness_service, release_service) = match store {
        Some(store) => (
            FitnessService::new(store.clone(), &config.fitness_table),
            ReleaseService::new(store, &config.releases_table),
        ),
        None => (FitnessService::unconfigured(), ReleaseService::unconfigured()),
    };

    let identity = match &config.mock_identity {
        Some(email) => {
            tracing::warn!("Mock identity enabled: every request is {}", email);
            IdentityConfig::mock(email.clone())
        }
        None => IdentityConfig::from_header(config.identity_header.clone()),
    };

    // Create handler states
    let fitness_state = fitness::FitnessState {
        fitness: fitness_service.clone(),
    };
    let journal_state = journal::JournalState {
        releases: release_service.clone(),
        release_year: config.release_year.clone(),
    };
    let api_state = api::ApiState {
        fitness: fitness_service,
        releases: release_service,
    };
    let health_state = health::HealthState {
        store: config.store.clone(),
    };

    // Build router
    let app = routes::create_router(
        fitness_state,
        journal_state,
        api_state,
        health_state,
        identity,
    );

    // Start server
    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
