//! Location model for geocoded place names

use serde::{Deserialize, Serialize};

use crate::providers::locationiq::{GeocodeMatch, PROVIDER};
use crate::{ExplorerError, Result};

/// A geocoded place, keyed by the normalized query that produced it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Lower-cased, trimmed search text; the cache key
    pub search_query: String,
    /// Display name of the provider's top match
    pub formatted_query: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(
        search_query: impl Into<String>,
        formatted_query: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            search_query: search_query.into(),
            formatted_query: Some(formatted_query.into()),
            latitude,
            longitude,
        }
    }

    /// Build a location from the provider's top match.
    ///
    /// The provider reports coordinates as strings; a missing or unparseable
    /// coordinate is a malformed payload.
    pub fn from_match(search_query: &str, top: &GeocodeMatch) -> Result<Self> {
        Ok(Self {
            search_query: search_query.to_string(),
            formatted_query: top.display_name.clone(),
            latitude: parse_coordinate("lat", top.lat.as_deref())?,
            longitude: parse_coordinate("lon", top.lon.as_deref())?,
        })
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

fn parse_coordinate(field: &str, raw: Option<&str>) -> Result<f64> {
    let raw = raw.ok_or_else(|| {
        ExplorerError::provider(PROVIDER, format!("match is missing '{field}'"))
    })?;
    raw.trim().parse::<f64>().map_err(|e| {
        ExplorerError::provider(PROVIDER, format!("invalid '{field}' value '{raw}': {e}"))
    })
}
