use async_trait::async_trait;
use report_core::{Observation, SourceError, StatisticsProvider};
use serde::Deserialize;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::time::Duration;

pub const BASE_URL: &str = "https://api.worldbank.org/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const PER_PAGE: u32 = 10;

/// World Bank indicator API client
#[derive(Clone)]
pub struct WorldBankClient {
    client: reqwest::Client,
    base_url: String,
}

impl WorldBankClient {
    pub fn new() -> Self {
        Self::with_timeout(BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into(),
        }
    }

    /// Observations for one country and indicator, newest first as served.
    pub async fn get_indicator(
        &self,
        country_code: &str,
        indicator: &str,
        years: RangeInclusive<i32>,
    ) -> Result<Vec<IndicatorValue>, SourceError> {
        let url = format!(
            "{}/country/{}/indicator/{}",
            self.base_url, country_code, indicator
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("date", format!("{}:{}", years.start(), years.end())),
                ("per_page", PER_PAGE.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;

        parse_indicator_page(&body)
    }
}

impl Default for WorldBankClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatisticsProvider for WorldBankClient {
    async fn latest_observation(
        &self,
        country_code: &str,
        indicator: &str,
        years: RangeInclusive<i32>,
    ) -> Result<Option<Observation>, SourceError> {
        let values = self.get_indicator(country_code, indicator, years).await?;
        let latest = values.into_iter().find_map(|v| {
            v.value.filter(|x| x.is_finite()).map(|value| Observation {
                value,
                year: v.date,
            })
        });

        if latest.is_none() {
            tracing::debug!("World Bank: no {} value for {}", indicator, country_code);
        }
        Ok(latest)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorValue {
    pub date: String,
    pub value: Option<f64>,
}

/// The API answers `[page_meta, entries]`; an error is a one-element array
/// carrying a `message` list, and an empty window has `entries = null`.
fn parse_indicator_page(body: &Value) -> Result<Vec<IndicatorValue>, SourceError> {
    let page = body
        .as_array()
        .ok_or_else(|| SourceError::InvalidResponse("expected a JSON array".to_string()))?;

    if let Some(message) = page
        .first()
        .and_then(|meta| meta.pointer("/message/0/value"))
        .and_then(|v| v.as_str())
    {
        return Err(SourceError::NoData(message.to_string()));
    }

    match page.get(1) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(entries) => serde_json::from_value(entries.clone())
            .map_err(|e| SourceError::InvalidResponse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(entries: Value) -> Value {
        json!([{ "page": 1, "pages": 1, "per_page": 10, "total": 3 }, entries])
    }

    #[test]
    fn test_parse_error_message() {
        let body = json!([{ "message": [{ "id": "120", "key": "Invalid value", "value": "The provided parameter value is not valid" }] }]);
        assert!(parse_indicator_page(&body).unwrap_err().is_empty_result());
    }

    #[test]
    fn test_parse_null_entries() {
        let body = json!([{ "page": 0, "pages": 0, "total": 0 }, null]);
        assert!(parse_indicator_page(&body).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_observation_skips_nulls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/country/US/indicator/FP.CPI.TOTL.ZG"))
            .and(query_param("date", "2018:2024"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
                { "countryiso3code": "USA", "date": "2024", "value": null },
                { "countryiso3code": "USA", "date": "2023", "value": 4.116 },
                { "countryiso3code": "USA", "date": "2022", "value": 8.0 }
            ]))))
            .mount(&server)
            .await;

        let client = WorldBankClient::with_timeout(server.uri(), Duration::from_secs(5));
        let observation = client
            .latest_observation("US", "FP.CPI.TOTL.ZG", 2018..=2024)
            .await
            .unwrap();
        assert_eq!(
            observation,
            Some(Observation {
                value: 4.116,
                year: "2023".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_all_null_window_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/country/EU/indicator/FR.INR.RINR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
                { "date": "2024", "value": null },
                { "date": "2023", "value": null }
            ]))))
            .mount(&server)
            .await;

        let client = WorldBankClient::with_timeout(server.uri(), Duration::from_secs(5));
        let observation = client
            .latest_observation("EU", "FR.INR.RINR", 2019..=2025)
            .await
            .unwrap();
        assert!(observation.is_none());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page(json!([])))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = WorldBankClient::with_timeout(server.uri(), Duration::from_millis(50));
        let err = client
            .latest_observation("JP", "NY.GDP.MKTP.CD", 2018..=2024)
            .await
            .unwrap_err();
        assert_eq!(err, SourceError::Timeout);
    }

    #[tokio::test]
    async fn test_server_error_is_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = WorldBankClient::with_timeout(server.uri(), Duration::from_secs(5));
        let err = client
            .latest_observation("DE", "SL.UEM.TOTL.ZS", 2018..=2024)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Http { status: 502, .. }));
    }
}
