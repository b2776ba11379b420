//! LocationIQ forward geocoding

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{Geocoder, ProviderClient, decode};
use crate::Result;

pub const PROVIDER: &str = "locationiq";

/// One search match; coordinates arrive as strings
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeMatch {
    pub display_name: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

#[async_trait]
impl Geocoder for ProviderClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeMatch>> {
        let upstream = &self.config.geocode;
        let url = format!(
            "{}?key={}&q={}&format=json",
            upstream.endpoint("/v1/search.php"),
            urlencoding::encode(upstream.key()),
            urlencoding::encode(query)
        );

        let response = self.send(PROVIDER, self.client.get(url)).await?;

        // LocationIQ answers "Unable to geocode" with a 404
        if response.status() == StatusCode::NOT_FOUND {
            warn!("No geocoding results for '{}'", query);
            return Ok(Vec::new());
        }

        let matches: Vec<GeocodeMatch> = decode(PROVIDER, response).await?;
        info!("Found {} geocoding matches for '{}'", matches.len(), query);
        Ok(matches)
    }
}
