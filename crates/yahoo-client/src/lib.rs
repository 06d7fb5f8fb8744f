//! Yahoo Finance adapter implementing [`MarketDataProvider`].
//!
//! Requests are sent once; failures are mapped onto [`SourceError`] and it is
//! up to the caller to decide whether a failure is fatal or degradable.

mod quote;
mod statements;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use report_core::{
    CalendarInfo, Fundamentals, MarketDataProvider, PriceBar, ProviderNews, SourceError,
    StatementKind, StatementTable,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Headlines requested from the search endpoint.
const NEWS_COUNT: u32 = 12;

/// How long a failed crumb handshake is remembered before it is retried.
const CRUMB_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Years of annual statements requested from the timeseries endpoint.
const STATEMENT_LOOKBACK_YEARS: i32 = 10;

#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
    cookie_url: String,
    crumb: Arc<Mutex<CrumbCache>>,
}

#[derive(Debug, Default)]
struct CrumbCache {
    crumb: Option<String>,
    failed_at: Option<Instant>,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL, COOKIE_URL)
    }

    /// Point the client at another host, used by tests against a mock server.
    pub fn with_base_url(base_url: &str, cookie_url: &str) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_url: cookie_url.to_string(),
            crumb: Arc::new(Mutex::new(CrumbCache::default())),
        }
    }

    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, SourceError> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::Request(e.to_string())
            }
        })
    }

    async fn get_json(&self, builder: reqwest::RequestBuilder) -> Result<Value, SourceError> {
        let response = self.send_request(builder).await?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))
    }

    /// Session crumb required by the quoteSummary endpoint. Fetched once and
    /// cached; `None` when the handshake fails, in which case requests go out
    /// without it. A failure is remembered for [`CRUMB_RETRY_AFTER`].
    async fn crumb(&self) -> Option<String> {
        {
            let cache = self.crumb.lock().await;
            if let Some(crumb) = cache.crumb.as_ref() {
                return Some(crumb.clone());
            }
            if cache
                .failed_at
                .is_some_and(|at| at.elapsed() < CRUMB_RETRY_AFTER)
            {
                return None;
            }
        }

        // The lock is not held across the handshake.
        let fetched = self.fetch_crumb().await;

        let mut cache = self.crumb.lock().await;
        match &fetched {
            Some(crumb) => {
                cache.crumb = Some(crumb.clone());
                cache.failed_at = None;
            }
            None => cache.failed_at = Some(Instant::now()),
        }
        fetched
    }

    async fn fetch_crumb(&self) -> Option<String> {
        // Sets the session cookie; the status is irrelevant.
        if let Err(e) = self.send_request(self.client.get(&self.cookie_url)).await {
            tracing::debug!("Yahoo cookie request failed: {}", e);
        }

        let url = format!("{}/v1/test/getcrumb", self.base_url);
        let response = match self.send_request(self.client.get(&url)).await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!("Yahoo crumb request returned HTTP {}", r.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("Yahoo crumb request failed: {}", e);
                return None;
            }
        };

        let crumb = response.text().await.ok()?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return None;
        }
        Some(crumb)
    }

    async fn quote_summary(&self, symbol: &str, modules: &str) -> Result<Value, SourceError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let mut query = vec![("modules", modules.to_string())];
        if let Some(crumb) = self.crumb().await {
            query.push(("crumb", crumb));
        }

        let body = self.get_json(self.client.get(&url).query(&query)).await?;
        quote::summary_result(&body, symbol).cloned()
    }

    /// Scalar fundamentals for a symbol
    pub async fn get_fundamentals(&self, symbol: &str) -> Result<Fundamentals, SourceError> {
        let result = self.quote_summary(symbol, quote::FUNDAMENTAL_MODULES).await?;
        let fundamentals = quote::parse_fundamentals(&result);

        if fundamentals.short_name.is_none() && fundamentals.price() == 0.0 {
            return Err(SourceError::NoData(format!("no fundamentals for {}", symbol)));
        }
        Ok(fundamentals)
    }

    /// Annual statement, periods newest first
    pub async fn get_annual_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<StatementTable, SourceError> {
        let url = format!(
            "{}/ws/fundamentals-timeseries/v1/finance/timeseries/{}",
            self.base_url, symbol
        );
        let now = Utc::now();
        let start = Utc
            .with_ymd_and_hms(now.year() - STATEMENT_LOOKBACK_YEARS, 1, 1, 0, 0, 0)
            .single()
            .map(|dt| dt.timestamp())
            .unwrap_or(0);

        let body = self
            .get_json(self.client.get(&url).query(&[
                ("symbol", symbol.to_string()),
                ("type", statements::timeseries_types(kind)),
                ("period1", start.to_string()),
                ("period2", now.timestamp().to_string()),
            ]))
            .await?;

        let table = statements::parse_timeseries(kind, &body)?;
        if table.is_empty() {
            return Err(SourceError::NoData(format!("no {} statement for {}", kind, symbol)));
        }
        Ok(table)
    }

    /// Daily bars over the trailing `years`; days without a close are skipped.
    pub async fn get_price_history(&self, symbol: &str, years: u32) -> Result<Vec<PriceBar>, SourceError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let response: ChartResponse = serde_json::from_value(
            self.get_json(self.client.get(&url).query(&[
                ("range", format!("{}y", years)),
                ("interval", "1d".to_string()),
            ]))
            .await?,
        )
        .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };
        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return Ok(Vec::new());
        };

        let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();
        let bars = result
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let close = at(&quote.close, i)?;
                Some(PriceBar {
                    timestamp: DateTime::from_timestamp(*ts, 0)?,
                    open: at(&quote.open, i).unwrap_or(close),
                    high: at(&quote.high, i).unwrap_or(close),
                    low: at(&quote.low, i).unwrap_or(close),
                    close,
                    volume: at(&quote.volume, i).unwrap_or(0.0),
                })
            })
            .collect();

        Ok(bars)
    }

    pub async fn get_news(&self, symbol: &str) -> Result<Vec<ProviderNews>, SourceError> {
        let url = format!("{}/v1/finance/search", self.base_url);
        let response: SearchResponse = serde_json::from_value(
            self.get_json(self.client.get(&url).query(&[
                ("q", symbol.to_string()),
                ("newsCount", NEWS_COUNT.to_string()),
                ("quotesCount", "0".to_string()),
            ]))
            .await?,
        )
        .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        Ok(response
            .news
            .into_iter()
            .map(|n| ProviderNews {
                title: n.title,
                link: n.link,
                publisher: n.publisher,
                published_at: n.provider_publish_time,
            })
            .collect())
    }

    pub async fn get_calendar(&self, symbol: &str) -> Result<CalendarInfo, SourceError> {
        let result = self.quote_summary(symbol, quote::CALENDAR_MODULES).await?;
        Ok(quote::parse_calendar(&result))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, SourceError> {
        self.get_fundamentals(symbol).await
    }

    async fn annual_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<StatementTable, SourceError> {
        self.get_annual_statement(symbol, kind).await
    }

    async fn price_history(&self, symbol: &str, years: u32) -> Result<Vec<PriceBar>, SourceError> {
        self.get_price_history(symbol, years).await
    }

    async fn news(&self, symbol: &str) -> Result<Vec<ProviderNews>, SourceError> {
        self.get_news(symbol).await
    }

    async fn calendar(&self, symbol: &str) -> Result<CalendarInfo, SourceError> {
        self.get_calendar(symbol).await
    }
}

// Response structures

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    title: String,
    link: Option<String>,
    publisher: Option<String>,
    provider_publish_time: Option<i64>,
}
