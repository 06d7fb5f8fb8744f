//! Default values substituted when a source is unavailable.
//!
//! Everything here can be overridden from a JSON document with the same
//! shape; fields missing from the document keep their built-in values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{CentralBankRate, FedEconomicData, InflationRate, TranscriptLinks, TreasuryYield};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
}

impl Country {
    fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

/// Fallback news entry. `title` and `link` are templates, see [`render_template`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTemplate {
    pub title: String,
    pub link: String,
    pub publisher: String,
}

/// Provenance labels used when the oracle gives no answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceLabels {
    pub central_banks: String,
    pub inflation: String,
    pub treasury: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallbackTables {
    pub central_bank_rates: Vec<CentralBankRate>,
    pub inflation_rates: Vec<InflationRate>,
    pub treasury_yields: Vec<TreasuryYield>,
    pub provenance: ProvenanceLabels,
    /// Countries queried for the real interest rate panel.
    pub rate_countries: Vec<Country>,
    /// Countries queried for the economic indicator panel.
    pub indicator_countries: Vec<Country>,
    pub peer_map: BTreeMap<String, Vec<String>>,
    pub news_links: Vec<LinkTemplate>,
    /// Templates for [`TranscriptLinks`].
    pub transcript_links: TranscriptLinks,
    pub tariff_message: String,
    pub fed_data: FedEconomicData,
}

impl FallbackTables {
    pub fn peers_for(&self, symbol: &str) -> &[String] {
        self.peer_map
            .get(&symbol.to_uppercase())
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }
}

/// Substitute `{company}`, `{ticker}` and `{ticker_lower}` in a template.
pub fn render_template(template: &str, company: &str, ticker: &str) -> String {
    template
        .replace("{company}", company)
        .replace("{ticker_lower}", &ticker.to_lowercase())
        .replace("{ticker}", ticker)
}

fn cb(country: &str, bank: &str, rate: &str, last_change: &str) -> CentralBankRate {
    CentralBankRate {
        country: country.to_string(),
        bank: bank.to_string(),
        rate: rate.to_string(),
        last_change: last_change.to_string(),
    }
}

fn infl(country: &str, rate: &str) -> InflationRate {
    InflationRate {
        country: country.to_string(),
        rate: rate.to_string(),
        last_update: "Jan 2026".to_string(),
    }
}

fn ty(maturity: &str, yield_pct: &str, change: &str) -> TreasuryYield {
    TreasuryYield {
        maturity: maturity.to_string(),
        yield_pct: yield_pct.to_string(),
        change: change.to_string(),
    }
}

fn link(title: &str, link: &str, publisher: &str) -> LinkTemplate {
    LinkTemplate {
        title: title.to_string(),
        link: link.to_string(),
        publisher: publisher.to_string(),
    }
}

impl Default for FallbackTables {
    fn default() -> Self {
        let peers = |list: [&str; 4]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut peer_map = BTreeMap::new();
        peer_map.insert("AAPL".to_string(), peers(["MSFT", "GOOGL", "META", "AMZN"]));
        peer_map.insert("MSFT".to_string(), peers(["AAPL", "GOOGL", "META", "AMZN"]));
        peer_map.insert("GOOGL".to_string(), peers(["AAPL", "MSFT", "META", "AMZN"]));
        peer_map.insert("META".to_string(), peers(["AAPL", "MSFT", "GOOGL", "SNAP"]));
        peer_map.insert("TSLA".to_string(), peers(["F", "GM", "RIVN", "TM"]));
        peer_map.insert("JPM".to_string(), peers(["BAC", "WFC", "C", "GS"]));
        peer_map.insert("XOM".to_string(), peers(["CVX", "COP", "BP", "SHEL"]));

        Self {
            central_bank_rates: vec![
                cb("United States", "Federal Reserve", "4.25-4.50%", "Dec 2025"),
                cb("Germany", "ECB", "3.75%", "Dec 2025"),
                cb("United Kingdom", "Bank of England", "4.75%", "Nov 2025"),
                cb("China", "PBoC", "3.45%", "Jan 2026"),
                cb("France", "ECB", "3.75%", "Dec 2025"),
                cb("Japan", "Bank of Japan", "0.25%", "Oct 2025"),
                cb("Euro Area", "ECB", "3.75%", "Dec 2025"),
            ],
            inflation_rates: vec![
                infl("United States", "3.2%"),
                infl("Germany", "2.8%"),
                infl("United Kingdom", "3.5%"),
                infl("China", "0.8%"),
                infl("France", "2.9%"),
                infl("Japan", "2.6%"),
                infl("Euro Area", "2.7%"),
            ],
            treasury_yields: vec![
                ty("1 Month", "4.42%", "+0.03"),
                ty("3 Month", "4.45%", "+0.02"),
                ty("6 Month", "4.38%", "-0.01"),
                ty("1 Year", "4.28%", "-0.05"),
                ty("2 Year", "4.18%", "-0.08"),
                ty("5 Year", "4.05%", "-0.12"),
                ty("10 Year", "3.92%", "-0.15"),
                ty("30 Year", "4.12%", "-0.08"),
            ],
            provenance: ProvenanceLabels {
                central_banks: "Central bank policy rates".to_string(),
                inflation: "Trading Economics / National Statistics Offices".to_string(),
                treasury: "US Treasury yields".to_string(),
            },
            rate_countries: vec![
                Country::new("USA", "US"),
                Country::new("Germany", "DE"),
                Country::new("United Kingdom", "GB"),
                Country::new("China", "CN"),
                Country::new("France", "FR"),
                Country::new("Japan", "JP"),
                Country::new("Euro Area", "EU"),
            ],
            indicator_countries: vec![
                Country::new("United States", "US"),
                Country::new("China", "CN"),
                Country::new("Japan", "JP"),
                Country::new("Germany", "DE"),
                Country::new("United Kingdom", "GB"),
                Country::new("France", "FR"),
                Country::new("India", "IN"),
            ],
            peer_map,
            news_links: vec![
                link("{company} - Latest Financial News and Market Updates", "https://finance.yahoo.com/quote/{ticker}/news", "Yahoo Finance"),
                link("{company} Stock News, Analysis and Earnings Reports", "https://www.marketwatch.com/investing/stock/{ticker_lower}", "MarketWatch"),
                link("{company} Company Updates and Press Releases", "https://seekingalpha.com/symbol/{ticker}/news", "Seeking Alpha"),
                link("{company} Business News and Market Coverage", "https://www.reuters.com/companies/{ticker}.O", "Reuters"),
                link("{company} Financial Analysis and Stock Performance", "https://www.bloomberg.com/quote/{ticker}:US", "Bloomberg"),
                link("{company} Earnings and Financial Results", "https://www.cnbc.com/quotes/{ticker}", "CNBC"),
                link("{company} Market Data and Real-time Updates", "https://www.google.com/finance/quote/{ticker}:NASDAQ", "Google Finance"),
                link("{company} Investment Research and Ratings", "https://www.fool.com/quote/{ticker_lower}", "Motley Fool"),
            ],
            transcript_links: TranscriptLinks {
                seeking_alpha: "https://seekingalpha.com/symbol/{ticker}/earnings/transcripts".to_string(),
                fool: "https://www.fool.com/earnings-call-transcripts/{ticker_lower}/".to_string(),
                yahoo: "https://finance.yahoo.com/quote/{ticker}/analysis".to_string(),
            },
            tariff_message: "No recent tariff announcements directly affecting {company} operations. Monitor trade policy updates for potential future impact.".to_string(),
            fed_data: FedEconomicData {
                fed_funds_rate: "Latest data from FRED".to_string(),
                inflation_rate: "Latest CPI data".to_string(),
                rate_info: "Latest economic indicators from Federal Reserve".to_string(),
                fed_news: "Monitor Federal Reserve website for latest policy announcements.".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tables: FallbackTables = serde_json::from_str(
            r#"{"peerMap": {"NVDA": ["AMD", "INTC", "AVGO", "QCOM"]}}"#,
        )
        .unwrap();
        assert_eq!(tables.peers_for("nvda").len(), 4);
        assert!(tables.peers_for("AAPL").is_empty());
        assert_eq!(tables.treasury_yields.len(), 8);
    }

    #[test]
    fn test_unmapped_ticker_has_no_peers() {
        let tables = FallbackTables::default();
        assert!(tables.peers_for("ZZZZ").is_empty());
        assert_eq!(tables.peers_for("tsla"), ["F", "GM", "RIVN", "TM"]);
    }

    #[test]
    fn test_render_template() {
        let rendered = render_template(
            "{company}: https://www.fool.com/quote/{ticker_lower} ({ticker})",
            "Apple Inc.",
            "AAPL",
        );
        assert_eq!(rendered, "Apple Inc.: https://www.fool.com/quote/aapl (AAPL)");
    }
}
