use fundamental_analysis::{BalanceAggregates, ReturnProfile};
use report_core::{
    EconomicIndicatorPanel, FedEconomicData, Fundamentals, NewsItem, PeerComparison, RatesPanel,
    RedFlag, TranscriptLinks, TrendSeries, UpcomingEvent,
};
use serde::Serialize;

/// Scalar headline figures of a report. Missing provider values render as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSnapshot {
    pub symbol: String,
    pub company_name: String,
    pub timestamp: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub eps: f64,
    pub debt_to_equity: f64,
    pub current_ratio: f64,
    pub quick_ratio: f64,
    pub roe: f64,
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,
    pub asset_turnover: f64,
    pub inventory_turnover: f64,
    pub receivables_turnover: f64,
    pub high_52: f64,
    pub low_52: f64,
    pub beta: f64,
    pub dividend_yield: f64,
    pub volume: f64,
    pub avg_volume: f64,
    pub revenue: f64,
    pub net_income: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub shareholders_equity: f64,
    pub free_cash_flow: f64,
    pub avg_return_3yr: f64,
    pub risk_free_rate: f64,
    pub return_std_dev: f64,
    pub sharpe_ratio: f64,
    pub sector: String,
    pub industry: String,
}

/// Ratio inputs that do not come straight from the fundamentals.
#[derive(Debug, Clone, Copy)]
pub struct DerivedRatios {
    pub returns: ReturnProfile,
    pub balance: BalanceAggregates,
    pub asset_turnover: f64,
    pub inventory_turnover: f64,
    pub receivables_turnover: f64,
}

fn percent(fraction: Option<f64>) -> f64 {
    fraction.map(|v| v * 100.0).unwrap_or(0.0)
}

impl TickerSnapshot {
    pub fn build(symbol: &str, f: &Fundamentals, ratios: &DerivedRatios, timestamp: String) -> Self {
        let price = f.price();
        let previous_close = f.previous_close.unwrap_or(price);
        let change = price - previous_close;
        let change_percent = if previous_close > 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };

        Self {
            symbol: symbol.to_string(),
            company_name: f.display_name(symbol),
            timestamp,
            price,
            change,
            change_percent,
            market_cap: f.market_cap.unwrap_or(0.0),
            pe_ratio: f.trailing_pe.unwrap_or(0.0),
            eps: f.trailing_eps.unwrap_or(0.0),
            debt_to_equity: f.debt_to_equity_ratio(),
            current_ratio: f.current_ratio.unwrap_or(0.0),
            quick_ratio: f.quick_ratio.unwrap_or(0.0),
            roe: percent(f.return_on_equity),
            gross_margin: percent(f.gross_margins),
            operating_margin: percent(f.operating_margins),
            net_margin: percent(f.profit_margins),
            asset_turnover: ratios.asset_turnover,
            inventory_turnover: ratios.inventory_turnover,
            receivables_turnover: ratios.receivables_turnover,
            high_52: f.fifty_two_week_high.unwrap_or(0.0),
            low_52: f.fifty_two_week_low.unwrap_or(0.0),
            beta: f.beta.unwrap_or(0.0),
            dividend_yield: percent(f.dividend_yield),
            volume: f.volume.unwrap_or(0.0),
            avg_volume: f.average_volume.unwrap_or(0.0),
            revenue: f.total_revenue.unwrap_or(0.0),
            net_income: f.net_income_to_common.unwrap_or(0.0),
            total_assets: ratios.balance.total_assets,
            total_liabilities: ratios.balance.total_liabilities,
            shareholders_equity: ratios.balance.shareholders_equity,
            free_cash_flow: f.free_cashflow.unwrap_or(0.0),
            avg_return_3yr: ratios.returns.avg_return,
            risk_free_rate: ratios.returns.risk_free_rate,
            return_std_dev: ratios.returns.std_dev,
            sharpe_ratio: ratios.returns.sharpe_ratio,
            sector: f.sector.clone().unwrap_or_else(|| "N/A".to_string()),
            industry: f.industry.clone().unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// The dashboard payload for one ticker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerReport {
    #[serde(flatten)]
    pub snapshot: TickerSnapshot,
    pub trends: TrendSeries,
    pub red_flags: Vec<RedFlag>,
    pub peer_comparison: PeerComparison,
    pub tariff_info: String,
    pub economic_indicators: EconomicIndicatorPanel,
    pub fed_economic_data: FedEconomicData,
    pub interest_rates: RatesPanel,
    pub transcript_links: TranscriptLinks,
    pub events: Vec<UpcomingEvent>,
    pub news: Vec<NewsItem>,
}
