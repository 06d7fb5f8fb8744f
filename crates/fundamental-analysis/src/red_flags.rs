use report_core::{Fundamentals, RedFlag, Severity, TrendPoint, TrendSeries};

const MAX_DEBT_TO_EQUITY: f64 = 2.0;
const MIN_CURRENT_RATIO: f64 = 1.0;
const DEBT_GROWTH_LIMIT: f64 = 1.2;
const HIGH_PE: f64 = 50.0;
const PE_SANITY_CEILING: f64 = 1000.0;
/// Points of a trend examined by the revenue and debt rules.
const TREND_WINDOW: usize = 4;

/// Rule-based scan of fundamentals and trends.
pub struct RedFlagAnalyzer;

impl RedFlagAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every rule; each matching rule contributes one flag, in rule order.
    pub fn analyze(&self, f: &Fundamentals, trends: &TrendSeries) -> Vec<RedFlag> {
        let mut flags = Vec::new();

        let debt_to_equity = f.debt_to_equity_ratio();
        if debt_to_equity > MAX_DEBT_TO_EQUITY {
            flags.push(flag(
                Severity::High,
                "Leverage",
                format!(
                    "High debt-to-equity ratio of {:.2} (above 2.0) indicates high financial leverage",
                    debt_to_equity
                ),
            ));
        }

        let fcf = f.free_cashflow.unwrap_or(0.0);
        if fcf < 0.0 {
            flags.push(flag(
                Severity::High,
                "Cash Flow",
                format!("Negative free cash flow of ${:.2}B - company burning cash", fcf / 1e9),
            ));
        }

        let current_ratio = f.current_ratio.unwrap_or(0.0);
        if current_ratio > 0.0 && current_ratio < MIN_CURRENT_RATIO {
            flags.push(flag(
                Severity::Medium,
                "Liquidity",
                format!(
                    "Current ratio of {:.2} below 1.0 - may struggle to pay short-term obligations",
                    current_ratio
                ),
            ));
        }

        if let Some((earliest, latest)) = window_ends(&trends.revenue) {
            if earliest > latest {
                let message = if earliest != 0.0 {
                    format!(
                        "Revenue declining trend ({:.1}%) over recent years",
                        percent_change(earliest, latest)
                    )
                } else {
                    "Revenue declining from a zero base over recent years".to_string()
                };
                flags.push(flag(Severity::High, "Revenue", message));
            }
        }

        if let Some((earliest, latest)) = window_ends(&trends.debt) {
            if latest > earliest * DEBT_GROWTH_LIMIT {
                let message = if earliest != 0.0 {
                    format!(
                        "Debt increasing significantly ({:.1}%) over recent years",
                        percent_change(earliest, latest)
                    )
                } else {
                    "Debt increasing significantly from a zero base over recent years".to_string()
                };
                flags.push(flag(Severity::Medium, "Debt", message));
            }
        }

        let net_income = f.net_income_to_common.unwrap_or(0.0);
        if net_income < 0.0 {
            flags.push(flag(
                Severity::High,
                "Profitability",
                format!(
                    "Negative net income of ${:.2}B - company is unprofitable",
                    net_income / 1e9
                ),
            ));
        }

        let pe = f.trailing_pe.unwrap_or(0.0);
        if pe > HIGH_PE && pe < PE_SANITY_CEILING {
            flags.push(flag(
                Severity::Low,
                "Valuation",
                format!(
                    "Very high P/E ratio of {:.2} - stock may be overvalued relative to earnings",
                    pe
                ),
            ));
        } else if pe < 0.0 {
            flags.push(flag(
                Severity::Medium,
                "Valuation",
                "Negative P/E ratio indicates negative earnings".to_string(),
            ));
        }

        tracing::debug!("Red flag rules matched: {}", flags.len());
        flags
    }
}

impl Default for RedFlagAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn flag(severity: Severity, category: &str, message: String) -> RedFlag {
    RedFlag {
        severity,
        category: category.to_string(),
        message,
    }
}

/// First and last value of the trailing window, if the series is long enough.
fn window_ends(series: &[TrendPoint]) -> Option<(f64, f64)> {
    if series.len() < TREND_WINDOW {
        return None;
    }
    let window = &series[series.len() - TREND_WINDOW..];
    Some((window[0].value, window[TREND_WINDOW - 1].value))
}

fn percent_change(earliest: f64, latest: f64) -> f64 {
    (latest - earliest) / earliest.abs() * 100.0
}
