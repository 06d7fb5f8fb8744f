use anyhow::{Context, Result};
use report_core::FallbackTables;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    // Web-search oracle
    pub anthropic_api_key: Option<String>,
    pub oracle_model: Option<String>,
    pub oracle_timeout: Duration,

    // World Bank statistics
    pub world_bank_timeout: Duration,
    /// Pause between countries in the indicator panel.
    pub indicator_delay: Duration,

    /// Optional JSON file overriding the built-in fallback tables.
    pub fallback_tables_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("PORT must be a port number")?,

            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            oracle_model: non_empty_var("ORACLE_MODEL"),
            oracle_timeout: Duration::from_secs(
                env::var("ORACLE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("ORACLE_TIMEOUT_SECS must be a whole number of seconds")?,
            ),

            world_bank_timeout: Duration::from_secs(
                env::var("WORLD_BANK_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .context("WORLD_BANK_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            indicator_delay: Duration::from_millis(
                env::var("INDICATOR_DELAY_MS")
                    .unwrap_or_else(|_| "150".to_string())
                    .parse()
                    .context("INDICATOR_DELAY_MS must be a whole number of milliseconds")?,
            ),

            fallback_tables_path: non_empty_var("FALLBACK_TABLES_PATH").map(PathBuf::from),
        };

        if config.anthropic_api_key.is_none() {
            tracing::warn!("ANTHROPIC_API_KEY not set, web-search fields will use fallback text");
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Built-in tables, or the JSON override when a path is configured.
    /// Keys missing from the file keep their built-in values.
    pub fn load_tables(&self) -> Result<FallbackTables> {
        let Some(path) = &self.fallback_tables_path else {
            return Ok(FallbackTables::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fallback tables from {}", path.display()))?;
        let tables = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid fallback tables in {}", path.display()))?;
        tracing::info!("Loaded fallback tables from {}", path.display());
        Ok(tables)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
