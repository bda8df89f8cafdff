use crate::errors::AppError;
use crate::kinds::{AnalysisKind, API_PREFIX, MAX_BATCH_SIZE};
use crate::models::{AnalyzeRequest, OutputRow};
use crate::namsor_client::NamsorClient;
use crate::services::NameAnalysisService;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Batch engine bound to the outbound transport.
    pub analysis: NameAnalysisService,
    /// Namsor client, used directly for the credential check.
    pub namsor: NamsorClient,
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-namsor-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/v1/operations
///
/// Lists every supported operation with its endpoints and required fields.
pub async fn list_operations() -> Json<Value> {
    let operations: Vec<Value> = AnalysisKind::ALL
        .iter()
        .map(|kind| {
            let p = kind.profile();
            json!({
                "operation": p.operation,
                "shape": p.shape,
                "batchField": p.batch_field,
                "endpoint": format!("{}{}", API_PREFIX, p.plain_endpoint),
                "geoEndpoint": p.geo_endpoint.map(|e| format!("{}{}", API_PREFIX, e)),
                "fields": p.fields.iter().map(|f| f.wire_name()).collect::<Vec<_>>(),
                "requiredFields": p.requirement.fields().iter().map(|f| f.wire_name()).collect::<Vec<_>>(),
            })
        })
        .collect();

    Json(json!({
        "maxBatchSize": MAX_BATCH_SIZE,
        "operations": operations,
    }))
}

/// POST /api/v1/analyze/:operation
///
/// Runs one batch through Namsor and returns one flat row per accepted name,
/// in input order.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `operation` - Operation id, e.g. `genderName`.
/// * `payload` - `{ "entries": [ { "name": [ ... ] } ] }`.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Path(operation): Path<String>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Vec<OutputRow>>, AppError> {
    let kind: AnalysisKind = operation.parse()?;
    let Json(request) =
        payload.map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;

    tracing::info!(
        "POST /analyze/{} - {} entry groups",
        kind,
        request.entries.len()
    );

    let rows = state.analysis.analyze(kind, &request.entries).await?;
    Ok(Json(rows))
}

/// POST /api/v1/credentials/verify
///
/// Confirms the configured API key with the Namsor account service.
pub async fn verify_credentials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let account = state.namsor.verify_credentials().await?;
    Ok(Json(json!({
        "valid": true,
        "account": account,
    })))
}
