//! Weatherbit daily forecast

use serde::Deserialize;
use tracing::{info, instrument};

use super::ProviderClient;
use crate::Result;

pub const PROVIDER: &str = "weatherbit";

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub data: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastDay {
    /// Forecast date, `YYYY-MM-DD`
    pub valid_date: Option<String>,
    pub weather: Option<ForecastConditions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConditions {
    pub description: Option<String>,
}

impl ProviderClient {
    /// Daily forecast entries for a coordinate
    #[instrument(skip(self))]
    pub async fn daily_forecast(&self, latitude: f64, longitude: f64) -> Result<Vec<ForecastDay>> {
        let upstream = &self.config.weather;
        let url = format!(
            "{}?lat={}&lon={}&key={}",
            upstream.endpoint("/v2.0/forecast/daily"),
            latitude,
            longitude,
            urlencoding::encode(upstream.key())
        );

        let response: ForecastResponse = self.fetch_json(PROVIDER, self.client.get(url)).await?;
        info!("Retrieved {} forecast days", response.data.len());
        Ok(response.data)
    }
}
