use thiserror::Error;

/// Failure reported by a source adapter (market data, statistics, oracle).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Timeout")]
    Timeout,

    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl SourceError {
    /// True when the source answered but had nothing for the query.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, SourceError::NoData(_))
    }
}

/// Outcome of a secondary sub-fetch after fallback handling.
///
/// `Fresh` carries data straight from the source; `Degraded` carries the
/// substituted placeholder together with the reason the source was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Fresh(T),
    Degraded { value: T, reason: String },
}

impl<T> Sourced<T> {
    pub fn from_result(result: Result<T, SourceError>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => Sourced::Fresh(value),
            Err(e) => Sourced::Degraded {
                value: fallback(),
                reason: e.to_string(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Sourced::Degraded { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            Sourced::Fresh(value) => value,
            Sourced::Degraded { value, .. } => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Fresh(value) => value,
            Sourced::Degraded { value, .. } => value,
        }
    }
}
