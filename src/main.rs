//! Escrow server binary.
//!
//! Wires configuration, the transaction store, and contract ingestion into
//! the REST router and serves it.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use escrow_core::config::port_from_env_value;
use escrow_core::constants::{DEFAULT_DATA_DIR, DEFAULT_PUBLIC_DIR};
use escrow_core::{ContractService, CoreConfig, TransactionStore};

/// Main entry point for the Escrow server
///
/// Starts the REST server on the configured port (default: 3000), serving
/// the JSON API under `/api`, Swagger UI under `/swagger-ui`, and the static
/// browser client for everything else.
///
/// # Environment Variables
/// - `PORT`: Listening port (default: 3000)
/// - `ESCROW_DATA_DIR`: Directory for the transactions document and contract
///   files (default: "data")
/// - `ESCROW_PUBLIC_DIR`: Static asset root (default: "public")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the contract directory cannot be created,
/// - the listening port cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("escrow_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = port_from_env_value(std::env::var("PORT").ok())?;
    let data_dir = std::env::var("ESCROW_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());
    let public_dir =
        std::env::var("ESCROW_PUBLIC_DIR").unwrap_or_else(|_| DEFAULT_PUBLIC_DIR.into());

    let cfg = Arc::new(CoreConfig::new(
        PathBuf::from(data_dir),
        PathBuf::from(public_dir),
    ));

    let store = Arc::new(TransactionStore::new(&cfg));
    let contracts = Arc::new(ContractService::new(&cfg, Arc::clone(&store))?);

    tracing::info!("++ Starting Escrow on 0.0.0.0:{}", port);
    tracing::info!("   data dir:   {}", cfg.data_dir().display());
    tracing::info!("   asset root: {}", cfg.public_dir().display());

    let app = api_rest::router(AppState {
        cfg,
        store,
        contracts,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
