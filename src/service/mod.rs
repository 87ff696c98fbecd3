mod catalog;
mod disposition;
mod translate;

pub use catalog::{Language, ServiceStatus};

use thiserror::Error;

/// Errors raised while talking to the translation server.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid server URL {0:?}")]
    InvalidUrl(String),

    #[error("Server returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// HTTP client for the translation server. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TranslationService {
    client: reqwest::Client,
    base_url: String,
}

impl TranslationService {
    /// No request timeout is configured: translation may take as long as
    /// the server needs.
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ServiceError::InvalidUrl(base_url));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
