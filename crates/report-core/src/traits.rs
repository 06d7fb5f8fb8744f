use async_trait::async_trait;
use std::ops::RangeInclusive;

use crate::{
    CalendarInfo, Fundamentals, Observation, PriceBar, ProviderNews, SourceError, StatementKind,
    StatementTable,
};

/// Ticker-keyed financial data source
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, SourceError>;

    /// Annual statement, periods newest first.
    async fn annual_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<StatementTable, SourceError>;

    /// Daily bars covering the trailing `years`.
    async fn price_history(&self, symbol: &str, years: u32) -> Result<Vec<PriceBar>, SourceError>;

    async fn news(&self, symbol: &str) -> Result<Vec<ProviderNews>, SourceError>;

    async fn calendar(&self, symbol: &str) -> Result<CalendarInfo, SourceError>;
}

/// Country/indicator-keyed macro statistics source
#[async_trait]
pub trait StatisticsProvider: Send + Sync {
    /// Most recent non-null observation inside `years`, `None` if the
    /// country has no value in the window.
    async fn latest_observation(
        &self,
        country_code: &str,
        indicator: &str,
        years: RangeInclusive<i32>,
    ) -> Result<Option<Observation>, SourceError>;
}

/// Free-text question/answer service backed by web search
#[async_trait]
pub trait SearchOracle: Send + Sync {
    /// Answer text for `prompt`. An empty answer is `SourceError::NoData`.
    async fn ask(&self, prompt: &str) -> Result<String, SourceError>;
}
