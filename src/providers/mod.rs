//! Upstream data providers
//!
//! One shared HTTP client issues a single request per operation. There is no
//! retry, no rate limiting and no timeout here; failures surface as
//! [`ExplorerError::Provider`] tagged with the upstream's name.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ProvidersConfig;
use crate::{ExplorerError, Result};

pub mod hiking_project;
pub mod locationiq;
pub mod weatherbit;
pub mod yelp;

pub use hiking_project::TrailSummary;
pub use locationiq::GeocodeMatch;
pub use weatherbit::ForecastDay;
pub use yelp::Business;

const USER_AGENT: &str = concat!("city-explorer/", env!("CARGO_PKG_VERSION"));

/// Forward geocoding capability consumed by the geocode cache
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up a place name; matches are ordered best first
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeMatch>>;
}

/// HTTP client for every upstream provider
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
    config: ProvidersConfig,
}

impl ProviderClient {
    /// Create a new client
    pub fn new(config: ProvidersConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ExplorerError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Send a request; only transport failures are errors at this point
    async fn send(&self, provider: &'static str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ExplorerError::provider(provider, format!("request failed: {e}")))?;
        debug!(provider, status = %response.status(), "Provider responded");
        Ok(response)
    }

    /// Send a request and decode a successful JSON body
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(provider, request).await?;
        decode(provider, response).await
    }
}

/// Map non-2xx statuses to errors and decode the JSON body
async fn decode<T: DeserializeOwned>(provider: &'static str, response: Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(match status.as_u16() {
            401 | 403 => {
                ExplorerError::provider(provider, format!("authorization failed (HTTP {status})"))
            }
            _ => ExplorerError::provider(provider, format!("HTTP {status}: {error_text}")),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ExplorerError::provider(provider, format!("failed to parse response: {e}")))
}
