use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Daily OHLCV bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Scalar fundamentals as reported by the market-data provider.
///
/// Every field is optional: the provider omits whatever it does not cover
/// for a given company. Ratios keep the provider's scale (debt-to-equity is
/// reported ×100, margins and yields as fractions).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub current_price: Option<f64>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub gross_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub profit_margins: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub beta: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub volume: Option<f64>,
    pub average_volume: Option<f64>,
    pub total_revenue: Option<f64>,
    pub net_income_to_common: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_stockholder_equity: Option<f64>,
    pub free_cashflow: Option<f64>,
}

impl Fundamentals {
    pub fn display_name(&self, symbol: &str) -> String {
        self.short_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| symbol.to_string())
    }

    /// Last traded price, falling back to the regular-market quote.
    pub fn price(&self) -> f64 {
        self.current_price
            .or(self.regular_market_price)
            .unwrap_or(0.0)
    }

    /// Debt-to-equity as a plain ratio. The provider reports it ×100.
    pub fn debt_to_equity_ratio(&self) -> f64 {
        match self.debt_to_equity {
            Some(d) if d != 0.0 && d.is_finite() => d / 100.0,
            _ => 0.0,
        }
    }
}

/// Which annual statement to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Income,
    Balance,
    Cashflow,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Income => "income",
            StatementKind::Balance => "balance",
            StatementKind::Cashflow => "cashflow",
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            StatementKind::Income => "Income Statement",
            StatementKind::Balance => "Balance Sheet",
            StatementKind::Cashflow => "Cash Flow Statement",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(StatementKind::Income),
            "balance" => Ok(StatementKind::Balance),
            "cashflow" => Ok(StatementKind::Cashflow),
            other => Err(format!("unknown statement type '{}'", other)),
        }
    }
}

/// One fiscal-year column of an annual statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub end_date: NaiveDate,
    pub values: HashMap<String, f64>,
}

impl StatementPeriod {
    pub fn fiscal_year(&self) -> String {
        self.end_date.format("%Y").to_string()
    }

    /// Value of a line item, `None` when absent or non-finite.
    pub fn get(&self, line_item: &str) -> Option<f64> {
        self.values.get(line_item).copied().filter(|v| v.is_finite())
    }
}

/// Annual statement keyed by line item and fiscal period.
///
/// `periods` are ordered newest first, as the provider reports them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementTable {
    pub kind: StatementKind,
    pub line_items: Vec<String>,
    pub periods: Vec<StatementPeriod>,
}

impl StatementTable {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            line_items: Vec::new(),
            periods: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.line_items.is_empty()
    }

    pub fn has_line(&self, line_item: &str) -> bool {
        self.line_items.iter().any(|l| l == line_item)
    }

    /// Most recent finite value of a line item.
    pub fn latest(&self, line_item: &str) -> Option<f64> {
        self.periods.first().and_then(|p| p.get(line_item))
    }

    /// The `n` most recent periods.
    pub fn recent(&self, n: usize) -> &[StatementPeriod] {
        &self.periods[..self.periods.len().min(n)]
    }
}

/// Earnings and dividend calendar entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub earnings_dates: Vec<NaiveDate>,
    pub ex_dividend_date: Option<NaiveDate>,
}

/// News item as delivered by the market-data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderNews {
    pub title: String,
    pub link: Option<String>,
    pub publisher: Option<String>,
    pub published_at: Option<i64>,
}

/// Latest observation of a statistics indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub value: f64,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub value: f64,
}

/// Multi-year annual series, each ordered oldest → newest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub free_cash_flow: Vec<TrendPoint>,
    pub pe_ratio: Vec<TrendPoint>,
    pub debt: Vec<TrendPoint>,
    pub revenue: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub severity: Severity,
    pub category: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRow {
    pub symbol: String,
    pub name: String,
    pub pe_ratio: f64,
    pub current_ratio: f64,
    pub market_cap: f64,
    pub debt_to_equity: f64,
}

impl PeerRow {
    pub fn from_fundamentals(symbol: &str, f: &Fundamentals) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            name: f.display_name(symbol),
            pe_ratio: f.trailing_pe.unwrap_or(0.0),
            current_ratio: f.current_ratio.unwrap_or(0.0),
            market_cap: f.market_cap.unwrap_or(0.0),
            debt_to_equity: f.debt_to_equity_ratio(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeerComparison {
    pub peers: Vec<PeerRow>,
    pub sector: String,
    pub industry: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealRate {
    pub country: String,
    pub rate: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentralBankRate {
    pub country: String,
    pub bank: String,
    pub rate: String,
    pub last_change: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationRate {
    pub country: String,
    pub rate: String,
    pub last_update: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryYield {
    pub maturity: String,
    #[serde(rename = "yield")]
    pub yield_pct: String,
    pub change: String,
}

/// Interest-rate panel shared by the report and the rates download.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesPanel {
    pub world_bank_rates: Vec<RealRate>,
    pub central_bank_rates: Vec<CentralBankRate>,
    pub inflation_rates: Vec<InflationRate>,
    pub treasury_yields: Vec<TreasuryYield>,
    pub cb_rates_info: String,
    pub inflation_info: String,
    pub treasury_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub publisher: String,
    pub timestamp: i64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorEntry {
    pub country: String,
    pub value: String,
    pub raw_value: f64,
    pub year: String,
}

/// Indicator name → most recent value per country.
pub type EconomicIndicatorPanel = BTreeMap<String, Vec<IndicatorEntry>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedEconomicData {
    pub fed_funds_rate: String,
    pub inflation_rate: String,
    pub rate_info: String,
    pub fed_news: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptLinks {
    pub seeking_alpha: String,
    pub fool: String,
    pub yahoo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: String,
    pub description: String,
}
