//! Annual trend extraction, computed ratios and rule-based red flags.

pub mod ratios;
pub mod red_flags;
pub mod trends;

pub use ratios::{
    asset_turnover, balance_aggregates, inventory_turnover, receivables_turnover, return_profile,
    BalanceAggregates, ReturnProfile, RISK_FREE_RATE_PCT,
};
pub use red_flags::RedFlagAnalyzer;
pub use trends::{TrendExtractor, MAX_TREND_POINTS};
