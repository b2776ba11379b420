//! Yelp Fusion business search

use serde::Deserialize;
use tracing::{info, instrument};

use super::ProviderClient;
use crate::{ExplorerError, Result};

pub const PROVIDER: &str = "yelp";

/// Businesses returned per page
pub const PAGE_SIZE: u32 = 4;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub businesses: Vec<Business>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Business {
    pub name: Option<String>,
    pub url: Option<String>,
    pub rating: Option<f64>,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

/// First result index for a 1-based page; `None` when it does not fit a `u32`
#[must_use]
pub fn page_offset(page: u32) -> Option<u32> {
    (page.max(1) - 1)
        .checked_mul(PAGE_SIZE)
        .and_then(|skipped| skipped.checked_add(1))
}

impl ProviderClient {
    /// One page of restaurants around a coordinate
    #[instrument(skip(self))]
    pub async fn search_restaurants(
        &self,
        latitude: f64,
        longitude: f64,
        page: u32,
    ) -> Result<Vec<Business>> {
        let offset = page_offset(page)
            .ok_or_else(|| ExplorerError::validation(format!("page {page} is out of range")))?;
        let upstream = &self.config.yelp;
        let url = format!(
            "{}?term=restaurants&latitude={}&longitude={}&limit={}&offset={}",
            upstream.endpoint("/v3/businesses/search"),
            latitude,
            longitude,
            PAGE_SIZE,
            offset
        );

        let mut request = self.client.get(url);
        if let Some(api_key) = upstream.api_key.as_deref() {
            request = request.bearer_auth(api_key);
        }

        let response: SearchResponse = self.fetch_json(PROVIDER, request).await?;
        info!("Found {} restaurants", response.businesses.len());
        Ok(response.businesses)
    }
}
