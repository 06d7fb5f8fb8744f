//! HTTP surface for the ticker dashboard: the report endpoint, health, and
//! statement / rates downloads.

mod config;
mod download_routes;
mod error;
mod stock_routes;

pub use config::ServerConfig;
pub use error::AppError;

use axum::Router;
use report_core::FallbackTables;
use report_orchestrator::ReportAssembler;
use search_oracle::{OracleConfig, WebSearchOracle};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use worldbank_client::WorldBankClient;
use yahoo_client::YahooClient;

#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<ReportAssembler>,
}

impl AppState {
    pub fn new(assembler: ReportAssembler) -> Self {
        Self {
            assembler: Arc::new(assembler),
        }
    }

    /// Production wiring: Yahoo Finance, World Bank and the web-search oracle.
    pub fn from_config(config: &ServerConfig, tables: FallbackTables) -> Self {
        let mut oracle_config = OracleConfig {
            api_key: config.anthropic_api_key.clone(),
            timeout: config.oracle_timeout,
            ..Default::default()
        };
        if let Some(model) = &config.oracle_model {
            oracle_config.model = model.clone();
        }

        let assembler = ReportAssembler::new(
            Arc::new(YahooClient::new()),
            Arc::new(WorldBankClient::with_timeout(
                worldbank_client::BASE_URL,
                config.world_bank_timeout,
            )),
            Arc::new(WebSearchOracle::new(oracle_config)),
            Arc::new(tables),
        )
        .with_indicator_delay(config.indicator_delay);

        Self::new(assembler)
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(stock_routes::stock_routes())
        .merge(download_routes::download_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    let tables = config.load_tables()?;
    let state = AppState::from_config(&config, tables);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
