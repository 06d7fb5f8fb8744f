use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use report_orchestrator::TickerReport;
use serde_json::{json, Value};

use crate::{AppError, AppState};

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stock/:ticker", get(get_stock_report))
        .route("/api/health", get(health))
}

async fn get_stock_report(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<TickerReport>, AppError> {
    let symbol = ticker.trim().to_uppercase();
    let report = state.assembler.assemble(&symbol).await?;
    Ok(Json(report))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
