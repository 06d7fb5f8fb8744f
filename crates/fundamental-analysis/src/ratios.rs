use report_core::line_items::{
    ACCOUNTS_RECEIVABLE, COST_OF_REVENUE, INVENTORY, STOCKHOLDERS_EQUITY, TOTAL_ASSETS,
    TOTAL_LIABILITIES, TOTAL_REVENUE,
};
use report_core::{Fundamentals, PriceBar, StatementTable};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Annual risk-free rate in percent used for the Sharpe ratio.
pub const RISK_FREE_RATE_PCT: f64 = 4.5;

const TRADING_DAYS: f64 = 252.0;

/// Annualized return statistics over a price history, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnProfile {
    pub avg_return: f64,
    pub std_dev: f64,
    pub risk_free_rate: f64,
    pub sharpe_ratio: f64,
}

/// Sharpe ratio inputs from daily closes.
///
/// An empty history reports mean 0 and standard deviation 1 with a Sharpe of
/// 0; a zero or undefined deviation also gives a Sharpe of 0.
pub fn return_profile(history: &[PriceBar]) -> ReturnProfile {
    let closes: Vec<f64> = history
        .iter()
        .map(|b| b.close)
        .filter(|c| c.is_finite())
        .collect();
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if returns.is_empty() {
        return ReturnProfile {
            avg_return: 0.0,
            std_dev: 1.0,
            risk_free_rate: RISK_FREE_RATE_PCT,
            sharpe_ratio: 0.0,
        };
    }

    let avg_return = returns.as_slice().mean() * TRADING_DAYS * 100.0;
    let std_dev = returns.as_slice().std_dev() * TRADING_DAYS.sqrt() * 100.0;
    let std_dev = if std_dev.is_finite() { std_dev } else { 0.0 };

    let sharpe_ratio = if std_dev > 0.0 {
        (avg_return - RISK_FREE_RATE_PCT) / std_dev
    } else {
        0.0
    };

    ReturnProfile {
        avg_return,
        std_dev,
        risk_free_rate: RISK_FREE_RATE_PCT,
        sharpe_ratio,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceAggregates {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub shareholders_equity: f64,
}

/// Latest balance-sheet totals: statement row first, then the flat summary
/// field, then 0.
pub fn balance_aggregates(balance: Option<&StatementTable>, f: &Fundamentals) -> BalanceAggregates {
    let latest = |item: &str| balance.and_then(|t| t.latest(item));

    BalanceAggregates {
        total_assets: latest(TOTAL_ASSETS).or(f.total_assets).unwrap_or(0.0),
        total_liabilities: latest(TOTAL_LIABILITIES).unwrap_or(0.0),
        shareholders_equity: latest(STOCKHOLDERS_EQUITY)
            .or(f.total_stockholder_equity)
            .unwrap_or(0.0),
    }
}

pub fn asset_turnover(revenue: f64, total_assets: f64) -> f64 {
    if total_assets > 0.0 {
        revenue / total_assets
    } else {
        0.0
    }
}

/// Latest cost of revenue over latest inventory, 0 when either is missing.
pub fn inventory_turnover(income: Option<&StatementTable>, balance: Option<&StatementTable>) -> f64 {
    let turnover = || {
        let cost = income?.latest(COST_OF_REVENUE)?;
        let inventory = balance?.latest(INVENTORY)?;
        (inventory > 0.0).then(|| cost / inventory)
    };
    turnover().unwrap_or(0.0)
}

/// Latest revenue over latest receivables, 0 when either is missing.
pub fn receivables_turnover(income: Option<&StatementTable>, balance: Option<&StatementTable>) -> f64 {
    let turnover = || {
        let revenue = income?.latest(TOTAL_REVENUE)?;
        let receivables = balance?.latest(ACCOUNTS_RECEIVABLE)?;
        (receivables > 0.0).then(|| revenue / receivables)
    };
    turnover().unwrap_or(0.0)
}
