//! Sequences every data source into one [`TickerReport`].

pub mod events;
pub mod news;
pub mod peers;
pub mod report;

pub use report::{DerivedRatios, TickerReport, TickerSnapshot};

use chrono::{Datelike, Local, Utc};
use fundamental_analysis::{
    asset_turnover, balance_aggregates, inventory_turnover, receivables_turnover, return_profile,
    RedFlagAnalyzer, TrendExtractor,
};
use macro_rates::MacroAggregator;
use report_core::{
    render_template, CalendarInfo, FallbackTables, MarketDataProvider, SearchOracle, SourceError,
    Sourced, StatementKind, StatementTable, StatisticsProvider,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Years of daily prices behind the Sharpe ratio.
const RETURN_HISTORY_YEARS: u32 = 3;
/// Years of daily prices behind the P/E trend.
const TREND_HISTORY_YEARS: u32 = 5;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to fetch data for {symbol}: {source}")]
    FetchFailed { symbol: String, source: SourceError },
}

pub struct ReportAssembler {
    market: Arc<dyn MarketDataProvider>,
    oracle: Arc<dyn SearchOracle>,
    tables: Arc<FallbackTables>,
    macro_rates: MacroAggregator,
    trend_extractor: TrendExtractor,
    red_flag_analyzer: RedFlagAnalyzer,
}

impl ReportAssembler {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        statistics: Arc<dyn StatisticsProvider>,
        oracle: Arc<dyn SearchOracle>,
        tables: Arc<FallbackTables>,
    ) -> Self {
        Self {
            macro_rates: MacroAggregator::new(statistics, oracle.clone(), tables.clone()),
            market,
            oracle,
            tables,
            trend_extractor: TrendExtractor::new(),
            red_flag_analyzer: RedFlagAnalyzer::new(),
        }
    }

    pub fn with_indicator_delay(mut self, delay: Duration) -> Self {
        self.macro_rates = self.macro_rates.with_indicator_delay(delay);
        self
    }

    pub fn market(&self) -> &dyn MarketDataProvider {
        self.market.as_ref()
    }

    pub fn macro_rates(&self) -> &MacroAggregator {
        &self.macro_rates
    }

    /// Build the full report. Only a failed fundamentals fetch is fatal;
    /// every other source degrades its own field.
    pub async fn assemble(&self, symbol: &str) -> Result<TickerReport, ReportError> {
        let symbol = symbol.trim().to_uppercase();
        tracing::info!("Assembling report for {}", symbol);

        let fundamentals = self.market.fundamentals(&symbol).await.map_err(|e| {
            tracing::warn!("Fundamentals for {} unavailable: {}", symbol, e);
            ReportError::FetchFailed {
                symbol: symbol.clone(),
                source: e,
            }
        })?;
        let company = fundamentals.display_name(&symbol);

        let history = degrade(
            "price history",
            &symbol,
            self.market.price_history(&symbol, RETURN_HISTORY_YEARS).await,
            Vec::new,
        );
        let returns = return_profile(&history);

        let balance = self.statement(&symbol, StatementKind::Balance).await;
        let balance_totals = balance_aggregates(balance.as_ref(), &fundamentals);

        let cashflow = self.statement(&symbol, StatementKind::Cashflow).await;
        let income = self.statement(&symbol, StatementKind::Income).await;
        let trend_history = degrade(
            "trend price history",
            &symbol,
            self.market.price_history(&symbol, TREND_HISTORY_YEARS).await,
            Vec::new,
        );

        let ratios = DerivedRatios {
            returns,
            balance: balance_totals,
            asset_turnover: asset_turnover(
                fundamentals.total_revenue.unwrap_or(0.0),
                balance_totals.total_assets,
            ),
            inventory_turnover: inventory_turnover(income.as_ref(), balance.as_ref()),
            receivables_turnover: receivables_turnover(income.as_ref(), balance.as_ref()),
        };

        tracing::debug!("Extracting trends for {}", symbol);
        let trends = self.trend_extractor.extract(
            cashflow.as_ref(),
            balance.as_ref(),
            income.as_ref(),
            &trend_history,
            fundamentals.trailing_eps,
        );
        let red_flags = self.red_flag_analyzer.analyze(&fundamentals, &trends);

        let peer_comparison =
            peers::compare_peers(self.market.as_ref(), &self.tables, &symbol, &fundamentals).await;

        let year = Utc::now().year();
        let tariff_info = degrade(
            "tariff news",
            &symbol,
            self.oracle
                .ask(&events::tariff_prompt(&company, &symbol, year))
                .await,
            || render_template(&self.tables.tariff_message, &company, &symbol),
        );

        let economic_indicators = self.macro_rates.economic_indicators().await;
        let fed_economic_data = self.macro_rates.fed_data().await;
        let interest_rates = self.macro_rates.rates_panel().await;

        let transcript_links =
            events::transcript_links(&self.tables.transcript_links, &company, &symbol);

        let calendar = degrade(
            "calendar",
            &symbol,
            self.market.calendar(&symbol).await,
            CalendarInfo::default,
        );
        let mut upcoming = events::calendar_events(&calendar, &company);
        match self
            .oracle
            .ask(&events::events_prompt(&company, &symbol, year))
            .await
        {
            Ok(answer) => upcoming.extend(events::agm_event(&answer, year)),
            Err(e) => tracing::warn!("Event research for {} unavailable: {}", symbol, e),
        }

        let provider_news = degrade("news", &symbol, self.market.news(&symbol).await, Vec::new);
        let news = news::build_news_feed(
            provider_news,
            &self.tables,
            &symbol,
            &company,
            Utc::now().timestamp(),
        );

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let snapshot = TickerSnapshot::build(&symbol, &fundamentals, &ratios, timestamp);

        tracing::info!(
            "Report for {} assembled: {} red flags, {} peers, {} news items",
            symbol,
            red_flags.len(),
            peer_comparison.peers.len(),
            news.len()
        );

        Ok(TickerReport {
            snapshot,
            trends,
            red_flags,
            peer_comparison,
            tariff_info,
            economic_indicators,
            fed_economic_data,
            interest_rates,
            transcript_links,
            events: upcoming,
            news,
        })
    }

    async fn statement(&self, symbol: &str, kind: StatementKind) -> Option<StatementTable> {
        degrade(
            kind.sheet_name(),
            symbol,
            self.market.annual_statement(symbol, kind).await.map(Some),
            || None,
        )
    }
}

/// Substitute `fallback` for a failed secondary fetch, logging the reason.
fn degrade<T>(
    what: &str,
    symbol: &str,
    result: Result<T, SourceError>,
    fallback: impl FnOnce() -> T,
) -> T {
    let sourced = Sourced::from_result(result, fallback);
    if let Sourced::Degraded { reason, .. } = &sourced {
        tracing::warn!("{} for {} degraded: {}", what, symbol, reason);
    }
    sourced.into_inner()
}
