// src/error.rs
use thiserror::Error;

/// Failure fetching a single URL. Always recovered locally: a failed fetch
/// degrades that URL to an empty result and the run continues.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timeout")]
    Timeout,

    #[error("TLS failure: {0}")]
    Tls(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
            FetchError::Tls(msg)
        } else {
            FetchError::Network(msg)
        }
    }
}

/// Failure of one source collaborator (search provider, AI model, WHOIS).
/// Recovered locally: the source contributes an empty result.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Http(#[from] FetchError),

    #[error("{provider} returned status {status}")]
    BadStatus { provider: &'static str, status: u16 },

    #[error("malformed {provider} response: {detail}")]
    Malformed {
        provider: &'static str,
        detail: String,
    },
}

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
