use chrono::{Datelike, Utc};
use report_core::FedEconomicData;

use crate::MacroAggregator;

impl MacroAggregator {
    /// Fed funds / CPI commentary and recent FOMC news. The two rate fields
    /// are fixed labels; the free-text fields come from the oracle when it
    /// answers.
    pub async fn fed_data(&self) -> FedEconomicData {
        let fallback = &self.tables().fed_data;
        let now = Utc::now();

        let rates_prompt = format!(
            "What is the current Federal Funds Rate and latest CPI inflation rate in the United States as of {}? Include the exact rates from official sources.",
            now.format("%B %Y")
        );
        let rate_info = match self.oracle.ask(&rates_prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Fed rate commentary unavailable: {}", e);
                fallback.rate_info.clone()
            }
        };

        let news_prompt = format!(
            "Search for the latest Federal Reserve announcements, FOMC meeting decisions, and interest rate policy news from the past month in {}-{}.",
            now.year() - 1,
            now.year()
        );
        let fed_news = match self.oracle.ask(&news_prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Fed news unavailable: {}", e);
                fallback.fed_news.clone()
            }
        };

        FedEconomicData {
            fed_funds_rate: fallback.fed_funds_rate.clone(),
            inflation_rate: fallback.inflation_rate.clone(),
            rate_info,
            fed_news,
        }
    }
}
