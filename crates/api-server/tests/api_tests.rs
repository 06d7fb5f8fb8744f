//! Router tests against in-memory providers.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use api_server::{build_router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{Datelike, Local, NaiveDate};
use report_core::{
    CalendarInfo, FallbackTables, Fundamentals, MarketDataProvider, Observation, PriceBar,
    ProviderNews, SearchOracle, SourceError, StatementKind, StatementPeriod, StatementTable,
    StatisticsProvider,
};
use report_orchestrator::ReportAssembler;
use tower::ServiceExt;

struct StubMarket;

fn last_fiscal_year() -> i32 {
    Local::now().year() - 1
}

#[async_trait]
impl MarketDataProvider for StubMarket {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, SourceError> {
        match symbol {
            "AAPL" => Ok(Fundamentals {
                short_name: Some("Apple Inc.".to_string()),
                current_price: Some(190.0),
                previous_close: Some(188.0),
                debt_to_equity: Some(150.0),
                trailing_eps: Some(6.0),
                ..Default::default()
            }),
            _ => Err(SourceError::NoData(symbol.to_string())),
        }
    }

    async fn annual_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<StatementTable, SourceError> {
        match (symbol, kind) {
            ("AAPL", StatementKind::Income) => {
                let mut table = StatementTable::new(kind);
                table.line_items = vec!["Total Revenue".to_string(), "Net Income".to_string()];
                for year in (2020..=last_fiscal_year().max(2024)).rev() {
                    let values: HashMap<String, f64> = [
                        ("Total Revenue".to_string(), 300_000.0 + year as f64),
                        ("Net Income".to_string(), 90_000.0),
                    ]
                    .into_iter()
                    .collect();
                    table.periods.push(StatementPeriod {
                        end_date: NaiveDate::from_ymd_opt(year, 9, 30).unwrap(),
                        values,
                    });
                }
                Ok(table)
            }
            ("FAIL", _) => Err(SourceError::Timeout),
            _ => Err(SourceError::NoData(format!("{} {}", symbol, kind))),
        }
    }

    async fn price_history(&self, _symbol: &str, _years: u32) -> Result<Vec<PriceBar>, SourceError> {
        Ok(Vec::new())
    }

    async fn news(&self, _symbol: &str) -> Result<Vec<ProviderNews>, SourceError> {
        Ok(Vec::new())
    }

    async fn calendar(&self, _symbol: &str) -> Result<CalendarInfo, SourceError> {
        Ok(CalendarInfo::default())
    }
}

struct EmptyStatistics;

#[async_trait]
impl StatisticsProvider for EmptyStatistics {
    async fn latest_observation(
        &self,
        _country_code: &str,
        _indicator: &str,
        _years: RangeInclusive<i32>,
    ) -> Result<Option<Observation>, SourceError> {
        Ok(None)
    }
}

struct OfflineOracle;

#[async_trait]
impl SearchOracle for OfflineOracle {
    async fn ask(&self, _prompt: &str) -> Result<String, SourceError> {
        Err(SourceError::NotConfigured("no api key".to_string()))
    }
}

fn test_app() -> axum::Router {
    let assembler = ReportAssembler::new(
        Arc::new(StubMarket),
        Arc::new(EmptyStatistics),
        Arc::new(OfflineOracle),
        Arc::new(FallbackTables::default()),
    )
    .with_indicator_delay(Duration::ZERO);
    build_router(AppState::new(assembler))
}

async fn get(uri: &str) -> axum::response::Response {
    test_app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_stock_report() {
    let response = get("/api/stock/aapl").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    for key in [
        "symbol",
        "price",
        "trends",
        "redFlags",
        "peerComparison",
        "interestRates",
        "news",
        "economicIndicators",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["symbol"], "AAPL");
    assert_eq!(json["companyName"], "Apple Inc.");
    assert_eq!(json["debtToEquity"], 1.5);
    assert_eq!(json["news"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_stock_report_failure() {
    let response = get("/api/stock/ZZZZ").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to fetch data");
}

#[tokio::test]
async fn test_download_selected_years_csv() {
    let response = get("/download/financials/aapl?type=income&years=2024,2019&format=csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"AAPL_income_2024.csv\""
    );

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(text, "Year,Total Revenue,Net Income\n2024,302024,90000\n");
}

#[tokio::test]
async fn test_download_defaults_to_workbook() {
    let response = get("/download/financials/AAPL?years=2021,2023").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"AAPL_income_2021-2023.xlsx\""
    );
    assert_eq!(&body_bytes(response).await[..2], b"PK");
}

#[tokio::test]
async fn test_download_invalid_type() {
    let response = get("/download/financials/AAPL?type=dividends").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid type");
}

#[tokio::test]
async fn test_download_missing_years() {
    let response = get("/download/financials/AAPL?years=2010,2011&format=csv").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Selected years not available in data"
    );
}

#[tokio::test]
async fn test_download_no_statement() {
    let response = get("/download/financials/AAPL?type=balance").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "No data available");
}

#[tokio::test]
async fn test_download_provider_failure() {
    let response = get("/download/financials/FAIL?years=2024").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_download_rates_csv() {
    let response = get("/download/rates?format=csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"interest_rates.csv\""
    );

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.starts_with("Treasury Yields\nmaturity,yield,change\n"));
    assert!(text.contains("Central Bank Rates\ncountry,bank,rate,lastChange\n"));
    assert!(text.contains("Inflation Rates\n"));
}

#[tokio::test]
async fn test_download_defaults_to_previous_five_years() {
    let response = get("/download/financials/AAPL?type=income&format=csv").await;
    assert_eq!(response.status(), StatusCode::OK);

    let latest = last_fiscal_year();
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"AAPL_income_{}-{}.csv\"", latest - 4, latest).as_str()
    );

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    let years: Vec<&str> = text.lines().skip(1).map(|l| &l[..4]).collect();
    let expected: Vec<String> = (0..5).map(|i| (latest - i).to_string()).collect();
    assert_eq!(years, expected);
}

#[tokio::test]
async fn test_download_rates_workbook() {
    let response = get("/download/rates").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"interest_rates.xlsx\""
    );
    assert_eq!(&body_bytes(response).await[..2], b"PK");
}
