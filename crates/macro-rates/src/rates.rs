use chrono::{Datelike, Utc};
use report_core::{CentralBankRate, InflationRate, RatesPanel, RealRate, TreasuryYield};

use crate::answer::percentage_for;
use crate::MacroAggregator;

/// World Bank real interest rate, percent.
pub const REAL_INTEREST_RATE: &str = "FR.INR.RINR";

/// Years before the current one searched for a real-rate observation.
const REAL_RATE_LOOKBACK: i32 = 6;

impl MacroAggregator {
    /// Full interest-rate panel. Always populated: oracle tables fall back
    /// to the configured placeholders.
    pub async fn rates_panel(&self) -> RatesPanel {
        let world_bank_rates = self.real_interest_rates().await;
        let as_of = Utc::now().format("%B %Y").to_string();

        let (central_bank_rates, cb_rates_info) = self.central_bank_rates(&as_of).await;
        let (inflation_rates, inflation_info) = self.inflation_rates(&as_of).await;
        let (treasury_yields, treasury_info) = self.treasury_yields(&as_of).await;

        RatesPanel {
            world_bank_rates,
            central_bank_rates,
            inflation_rates,
            treasury_yields,
            cb_rates_info,
            inflation_info,
            treasury_info,
        }
    }

    /// Latest real interest rate per country; countries without a value are omitted.
    pub async fn real_interest_rates(&self) -> Vec<RealRate> {
        let current = Utc::now().year();
        let window = (current - REAL_RATE_LOOKBACK)..=current;
        let mut rates = Vec::new();

        for country in &self.tables().rate_countries {
            match self
                .statistics
                .latest_observation(&country.code, REAL_INTEREST_RATE, window.clone())
                .await
            {
                Ok(Some(observation)) => rates.push(RealRate {
                    country: country.name.clone(),
                    rate: format!("{:.2}%", observation.value),
                    year: observation.year,
                }),
                Ok(None) => {
                    tracing::debug!("No real interest rate for {}", country.name);
                }
                Err(e) => {
                    tracing::warn!("World Bank real rate for {} failed: {}", country.name, e);
                }
            }
        }

        rates
    }

    async fn central_bank_rates(&self, as_of: &str) -> (Vec<CentralBankRate>, String) {
        let tables = self.tables();
        let listing: Vec<String> = tables
            .central_bank_rates
            .iter()
            .map(|r| format!("- {} ({})", r.country, r.bank))
            .collect();
        let prompt = format!(
            "What are the current central bank policy interest rates for these countries as of {}:\n{}\nInclude the exact policy rate for each.",
            as_of,
            listing.join("\n")
        );

        let mut rows = tables.central_bank_rates.clone();
        match self.oracle.ask(&prompt).await {
            Ok(answer) => {
                for row in rows.iter_mut() {
                    if let Some(rate) = percentage_for(&answer, &row.country) {
                        row.rate = rate;
                    }
                }
                (rows, answer)
            }
            Err(e) => {
                tracing::warn!("Central bank rates unavailable from oracle: {}", e);
                (rows, tables.provenance.central_banks.clone())
            }
        }
    }

    async fn inflation_rates(&self, as_of: &str) -> (Vec<InflationRate>, String) {
        let tables = self.tables();
        let listing: Vec<String> = tables
            .inflation_rates
            .iter()
            .map(|r| format!("- {}", r.country))
            .collect();
        let prompt = format!(
            "Get the latest inflation rates (CPI year-over-year) for these countries as of {}:\n{}\nInclude the exact percentage for each country.",
            as_of,
            listing.join("\n")
        );

        let mut rows = tables.inflation_rates.clone();
        match self.oracle.ask(&prompt).await {
            Ok(answer) => {
                for row in rows.iter_mut() {
                    if let Some(rate) = percentage_for(&answer, &row.country) {
                        row.rate = rate;
                        row.last_update = as_of.to_string();
                    }
                }
                (rows, answer)
            }
            Err(e) => {
                tracing::warn!("Inflation rates unavailable from oracle: {}", e);
                (rows, tables.provenance.inflation.clone())
            }
        }
    }

    async fn treasury_yields(&self, as_of: &str) -> (Vec<TreasuryYield>, String) {
        let tables = self.tables();
        let maturities: Vec<String> = tables
            .treasury_yields
            .iter()
            .map(|y| y.maturity.to_lowercase().replace(' ', "-"))
            .collect();
        let prompt = format!(
            "What are the current US Treasury yields for these maturities as of {}:\n{}\nInclude exact percentages.",
            as_of,
            maturities.join(", ")
        );

        let mut rows = tables.treasury_yields.clone();
        match self.oracle.ask(&prompt).await {
            Ok(answer) => {
                for row in rows.iter_mut() {
                    if let Some(yield_pct) = percentage_for(&answer, &row.maturity) {
                        if yield_pct != row.yield_pct {
                            row.change = "n/a".to_string();
                        }
                        row.yield_pct = yield_pct;
                    }
                }
                (rows, answer)
            }
            Err(e) => {
                tracing::warn!("Treasury yields unavailable from oracle: {}", e);
                (rows, tables.provenance.treasury.clone())
            }
        }
    }
}
