//! # API REST
//!
//! REST API implementation for Escrow.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Static asset serving for the browser client
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Business state lives in `escrow-core`; this crate only maps the HTTP
//! contract onto it.

#![warn(rust_2018_idioms)]

pub mod assets;
mod handlers;

use axum::routing::{get, patch, post};
use axum::Router;
use escrow_core::{ContractService, CoreConfig, Task, Transaction, TransactionStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
///
/// Contains the configuration and the services needed by the endpoints: the
/// transaction store and the contract ingestion service.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub store: Arc<TransactionStore>,
    pub contracts: Arc<ContractService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_transactions,
        handlers::create_transaction,
        handlers::create_task,
        handlers::toggle_task,
        handlers::ingest_contract,
    ),
    components(schemas(
        Transaction,
        Task,
        handlers::HealthRes,
        handlers::CreateTransactionReq,
        handlers::CreateTaskReq,
        handlers::IngestContractReq,
    ))
)]
struct ApiDoc;

/// Build the axum router: the API route table, Swagger UI, a permissive CORS
/// layer, and a fallback that serves the browser client's static assets.
///
/// Every `/api` route carries a method fallback so that an unrecognised verb
/// on a known path is 404 (not 405), and the router fallback keeps unknown
/// `/api` paths at 404 while everything else resolves against the asset root.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health).fallback(handlers::api_not_found))
        .route(
            "/api/transactions",
            get(handlers::list_transactions)
                .post(handlers::create_transaction)
                .fallback(handlers::api_not_found),
        )
        .route(
            "/api/transactions/:transaction_id/tasks",
            post(handlers::create_task).fallback(handlers::api_not_found),
        )
        .route(
            "/api/transactions/:transaction_id/tasks/:task_id",
            patch(handlers::toggle_task).fallback(handlers::api_not_found),
        )
        .route(
            "/api/contracts",
            post(handlers::ingest_contract).fallback(handlers::api_not_found),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::fallback)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
