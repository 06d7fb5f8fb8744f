use report_core::{EconomicIndicatorPanel, IndicatorEntry};
use std::ops::RangeInclusive;

use crate::MacroAggregator;

/// Panel name and World Bank indicator code.
pub const INDICATORS: [(&str, &str); 5] = [
    ("GDP", "NY.GDP.MKTP.CD"),
    ("CPI", "FP.CPI.TOTL.ZG"),
    ("Unemployment", "SL.UEM.TOTL.ZS"),
    ("Trade", "NE.TRD.GNFS.ZS"),
    ("Debt", "GC.DOD.TOTL.GD.ZS"),
];

pub const INDICATOR_YEARS: RangeInclusive<i32> = 2018..=2024;

/// GDP in trillions or billions of dollars, everything else as a percentage.
pub fn format_indicator_value(indicator: &str, value: f64) -> String {
    if indicator == "GDP" {
        if value >= 1e12 {
            format!("${:.2}T", value / 1e12)
        } else {
            format!("${:.2}B", value / 1e9)
        }
    } else {
        format!("{:.2}%", value)
    }
}

impl MacroAggregator {
    /// Latest value of each indicator per country. Every indicator key is
    /// present; countries without data are omitted from its list.
    pub async fn economic_indicators(&self) -> EconomicIndicatorPanel {
        let mut panel = EconomicIndicatorPanel::new();

        for (name, code) in INDICATORS {
            let mut entries = Vec::new();

            for country in &self.tables().indicator_countries {
                match self
                    .statistics
                    .latest_observation(&country.code, code, INDICATOR_YEARS)
                    .await
                {
                    Ok(Some(observation)) => entries.push(IndicatorEntry {
                        country: country.name.clone(),
                        value: format_indicator_value(name, observation.value),
                        raw_value: observation.value,
                        year: observation.year,
                    }),
                    Ok(None) => {
                        tracing::debug!("No {} value for {}", name, country.name);
                    }
                    Err(e) => {
                        tracing::warn!("World Bank {} for {} failed: {}", name, country.name, e);
                    }
                }

                if !self.indicator_delay.is_zero() {
                    tokio::time::sleep(self.indicator_delay).await;
                }
            }

            tracing::debug!("{} countries fetched for {}", entries.len(), name);
            panel.insert(name.to_string(), entries);
        }

        panel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubOracle, StubStatistics};
    use report_core::FallbackTables;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_format_indicator_value() {
        assert_eq!(format_indicator_value("GDP", 2.7e13), "$27.00T");
        assert_eq!(format_indicator_value("GDP", 3.5e12), "$3.50T");
        assert_eq!(format_indicator_value("GDP", 9.99e11), "$999.00B");
        assert_eq!(format_indicator_value("CPI", 4.116), "4.12%");
        assert_eq!(format_indicator_value("Unemployment", 3.6), "3.60%");
    }

    #[tokio::test]
    async fn test_panel_has_every_indicator() {
        let statistics = StubStatistics::default()
            .with("US", "NY.GDP.MKTP.CD", 2.77e13, "2023")
            .with("IN", "NY.GDP.MKTP.CD", 3.57e12, "2023")
            .with("CN", "FP.CPI.TOTL.ZG", 0.2, "2023")
            .failing("JP", "NY.GDP.MKTP.CD");
        let statistics = Arc::new(statistics);
        let aggregator = MacroAggregator::new(
            statistics.clone(),
            Arc::new(StubOracle::failing()),
            Arc::new(FallbackTables::default()),
        )
        .with_indicator_delay(Duration::ZERO);

        let panel = aggregator.economic_indicators().await;

        assert_eq!(panel.len(), 5);
        let gdp = &panel["GDP"];
        assert_eq!(gdp.len(), 2);
        assert_eq!(gdp[0].country, "United States");
        assert_eq!(gdp[0].value, "$27.70T");
        assert_eq!(gdp[1].country, "India");
        assert_eq!(panel["CPI"][0].value, "0.20%");
        assert!(panel["Debt"].is_empty());

        let windows = statistics.windows.lock().unwrap();
        assert_eq!(windows.len(), 35);
        assert!(windows.iter().all(|w| *w == (2018..=2024)));
    }
}
