// relay.rs
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::address::Target;
use crate::config::RelayConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid relay endpoint {endpoint:?}: {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to fetch content: {code} {reason}")]
    Status { code: u16, reason: String },
    #[error("Failed to fetch content: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Failed to read content: {0}")]
    Body(#[source] reqwest::Error),
}

/// Fetches pages through a public CORS relay that returns the raw target body.
#[derive(Debug, Clone)]
pub struct Relay {
    endpoint: Url,
    query_param: String,
    client: Client,
}

impl Relay {
    pub fn new(config: &RelayConfig) -> Result<Self, FetchError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|source| FetchError::Endpoint {
            endpoint: config.endpoint.clone(),
            source,
        })?;
        let client = Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            endpoint,
            query_param: config.query_param.clone(),
            client,
        })
    }

    /// The relay request address for `target`.
    pub fn relay_url(&self, target: &Target) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(&self.query_param, target.as_str());
        url
    }

    /// Single attempt: any non-2xx status or transport failure is returned as is.
    pub fn fetch(&self, target: &Target) -> Result<String, FetchError> {
        let url = self.relay_url(target);
        info!("fetching {} via {}", target, self.endpoint);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().map_err(FetchError::Body)?;
        debug!("received {} bytes for {}", body.len(), target);
        Ok(body)
    }
}
