//! Macro panels shared by every report: interest rates, economic indicators
//! and Federal Reserve commentary.
//!
//! Nothing here fails. Each source is queried once; a failure is logged and
//! the affected rows are either omitted (statistics) or replaced by the
//! configured fallback tables (oracle).

mod answer;
mod fed;
mod indicators;
mod rates;

pub use indicators::{format_indicator_value, INDICATORS, INDICATOR_YEARS};

use report_core::{FallbackTables, SearchOracle, StatisticsProvider};
use std::sync::Arc;
use std::time::Duration;

/// Pause after each country query in the indicator panel.
pub const DEFAULT_INDICATOR_DELAY: Duration = Duration::from_millis(150);

#[derive(Clone)]
pub struct MacroAggregator {
    statistics: Arc<dyn StatisticsProvider>,
    oracle: Arc<dyn SearchOracle>,
    tables: Arc<FallbackTables>,
    indicator_delay: Duration,
}

impl MacroAggregator {
    pub fn new(
        statistics: Arc<dyn StatisticsProvider>,
        oracle: Arc<dyn SearchOracle>,
        tables: Arc<FallbackTables>,
    ) -> Self {
        Self {
            statistics,
            oracle,
            tables,
            indicator_delay: DEFAULT_INDICATOR_DELAY,
        }
    }

    pub fn with_indicator_delay(mut self, delay: Duration) -> Self {
        self.indicator_delay = delay;
        self
    }

    pub fn tables(&self) -> &FallbackTables {
        &self.tables
    }
}
