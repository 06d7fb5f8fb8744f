use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{Datelike, Local};
use report_core::StatementKind;
use serde::Deserialize;
use statement_export::{
    default_years, export_rates, fetch_and_export, parse_years, ExportError, ExportFile,
    ExportFormat,
};

use crate::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct FinancialsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub years: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    pub format: Option<String>,
}

pub fn download_routes() -> Router<AppState> {
    Router::new()
        .route("/download/financials/:ticker", get(download_financials))
        .route("/download/rates", get(download_rates))
}

fn attachment(file: ExportFile) -> Response {
    let disposition = file.content_disposition();
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

fn format_param(format: Option<&str>) -> ExportFormat {
    format.map(ExportFormat::from_param).unwrap_or_default()
}

async fn download_financials(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<FinancialsQuery>,
) -> Result<Response, AppError> {
    let ticker = ticker.trim().to_uppercase();
    let kind: StatementKind = query
        .kind
        .as_deref()
        .unwrap_or("income")
        .parse()
        .map_err(ExportError::InvalidKind)?;

    let mut years = query.years.as_deref().map(parse_years).unwrap_or_default();
    if years.is_empty() {
        years = default_years(Local::now().year());
    }
    let format = format_param(query.format.as_deref());

    tracing::info!("Statement download: {} {} years={:?}", ticker, kind, years);
    let file = fetch_and_export(state.assembler.market(), &ticker, kind, &years, format).await?;
    Ok(attachment(file))
}

async fn download_rates(
    State(state): State<AppState>,
    Query(query): Query<RatesQuery>,
) -> Result<Response, AppError> {
    let panel = state.assembler.macro_rates().rates_panel().await;
    let file = export_rates(&panel, format_param(query.format.as_deref()))?;
    Ok(attachment(file))
}
