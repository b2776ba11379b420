//! Hiking Project trail search

use serde::Deserialize;
use tracing::{info, instrument};

use super::ProviderClient;
use crate::Result;

pub const PROVIDER: &str = "hikingproject";

/// Search radius in miles
const MAX_DISTANCE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct TrailsResponse {
    #[serde(default)]
    pub trails: Vec<TrailSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailSummary {
    pub name: Option<String>,
    pub location: Option<String>,
    pub length: Option<f64>,
    pub stars: Option<f64>,
    pub star_votes: Option<i64>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub condition_status: Option<String>,
    /// Combined `YYYY-MM-DD HH:MM:SS` timestamp
    pub condition_date: Option<String>,
}

impl ProviderClient {
    /// Trails around a coordinate
    #[instrument(skip(self))]
    pub async fn search_trails(&self, latitude: f64, longitude: f64) -> Result<Vec<TrailSummary>> {
        let upstream = &self.config.trails;
        let url = format!(
            "{}?lat={}&lon={}&maxDistance={}&key={}",
            upstream.endpoint("/data/get-trails"),
            latitude,
            longitude,
            MAX_DISTANCE,
            urlencoding::encode(upstream.key())
        );

        let response: TrailsResponse = self.fetch_json(PROVIDER, self.client.get(url)).await?;
        info!("Found {} trails", response.trails.len());
        Ok(response.trails)
    }
}
