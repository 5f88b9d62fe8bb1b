//! HTTP request handlers for the Escrow REST API.

use axum::extract::{Path as AxumPath, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use escrow_core::{Task, Transaction, TransactionError};

use crate::{assets, AppState};

/// Health check response body.
#[derive(Serialize, ToSchema)]
pub(crate) struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body of `POST /api/transactions`. Missing fields default to the empty
/// string rather than rejecting the request.
#[derive(Deserialize, ToSchema)]
pub(crate) struct CreateTransactionReq {
    #[serde(default)]
    property: String,
    #[serde(default)]
    buyer: String,
    #[serde(default)]
    seller: String,
}

/// Body of `POST /api/transactions/{transaction_id}/tasks`.
#[derive(Deserialize, ToSchema)]
pub(crate) struct CreateTaskReq {
    #[serde(default)]
    description: String,
    #[serde(rename = "dueDate")]
    due_date: Option<String>,
}

/// Body of `POST /api/contracts`. `content` is base64 of a UTF-8 JSON
/// document `{property, buyer, seller}`.
#[derive(Deserialize, ToSchema)]
pub(crate) struct IngestContractReq {
    #[serde(default)]
    name: String,
    #[serde(default)]
    content: String,
}

/// Map a core error to the status code and plain-text body of the HTTP
/// contract. Anything that is not a client fault is logged and reported as
/// an opaque 500; the process stays up.
fn error_response(err: TransactionError) -> (StatusCode, &'static str) {
    match err {
        TransactionError::TransactionNotFound(_) => {
            (StatusCode::NOT_FOUND, "Transaction not found")
        }
        TransactionError::TaskNotFound(_) => (StatusCode::NOT_FOUND, "Task not found"),
        TransactionError::ContractBase64(_)
        | TransactionError::ContractUtf8(_)
        | TransactionError::ContractDetails(_) => (StatusCode::BAD_REQUEST, "Invalid contract"),
        other => {
            tracing::error!("request failed: {:?}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub(crate) async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Escrow API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    responses(
        (status = 200, description = "All transactions in insertion order", body = [Transaction])
    )
)]
/// List all transactions
///
/// Returns the full collection, each transaction embedding its task
/// checklist in display order.
#[axum::debug_handler]
pub(crate) async fn list_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    Json(state.store.list().await)
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = CreateTransactionReq,
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a new transaction
///
/// The server assigns the id; the checklist starts empty.
#[axum::debug_handler]
pub(crate) async fn create_transaction(
    State(state): State<AppState>,
    Json(req): Json<CreateTransactionReq>,
) -> Result<(StatusCode, Json<Transaction>), (StatusCode, &'static str)> {
    match state
        .store
        .create_transaction(req.property, req.buyer, req.seller)
        .await
    {
        Ok(transaction) => Ok((StatusCode::CREATED, Json(transaction))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/transactions/{transaction_id}/tasks",
    request_body = CreateTaskReq,
    responses(
        (status = 201, description = "Task appended to the checklist", body = Task),
        (status = 400, description = "Malformed request body"),
        (status = 404, description = "Unknown transaction id"),
        (status = 500, description = "Internal server error")
    )
)]
/// Append a task to a transaction's checklist
#[axum::debug_handler]
pub(crate) async fn create_task(
    State(state): State<AppState>,
    AxumPath(transaction_id): AxumPath<String>,
    Json(req): Json<CreateTaskReq>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, &'static str)> {
    match state
        .store
        .append_task(&transaction_id, req.description, req.due_date)
        .await
    {
        Ok(task) => Ok((StatusCode::CREATED, Json(task))),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    patch,
    path = "/api/transactions/{transaction_id}/tasks/{task_id}",
    responses(
        (status = 200, description = "Task with its completion flag flipped", body = Task),
        (status = 404, description = "Unknown transaction or task id"),
        (status = 500, description = "Internal server error")
    )
)]
/// Toggle a task's completion flag
///
/// The only transition a task supports: pending to completed and back. The
/// request carries no body.
#[axum::debug_handler]
pub(crate) async fn toggle_task(
    State(state): State<AppState>,
    AxumPath((transaction_id, task_id)): AxumPath<(String, String)>,
) -> Result<Json<Task>, (StatusCode, &'static str)> {
    match state.store.toggle_task(&transaction_id, &task_id).await {
        Ok(task) => Ok(Json(task)),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/contracts",
    request_body = IngestContractReq,
    responses(
        (status = 201, description = "Transaction created from the contract", body = Transaction),
        (status = 400, description = "Content is not base64 of a UTF-8 JSON document"),
        (status = 500, description = "Internal server error")
    )
)]
/// Ingest an uploaded contract document
///
/// Decodes the document, creates its owning transaction, and stores the raw
/// bytes next to the transaction collection.
#[axum::debug_handler]
pub(crate) async fn ingest_contract(
    State(state): State<AppState>,
    Json(req): Json<IngestContractReq>,
) -> Result<(StatusCode, Json<Transaction>), (StatusCode, &'static str)> {
    match state.contracts.ingest(&req.name, &req.content).await {
        Ok(transaction) => Ok((StatusCode::CREATED, Json(transaction))),
        Err(e) => Err(error_response(e)),
    }
}

/// Method fallback for `/api` routes: an unsupported verb on a known path is
/// part of the 404 contract, not a 405.
pub(crate) async fn api_not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Router fallback: unknown `/api` paths stay 404; every other path is
/// resolved against the static asset root.
pub(crate) async fn fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }
    assets::serve(state.cfg.public_dir(), path).await
}
