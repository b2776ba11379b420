//! Query string validation
//!
//! Handlers receive the raw query map and turn it into typed parameters here,
//! before any provider or store call.

use std::collections::HashMap;

use crate::providers::yelp::page_offset;
use crate::{ExplorerError, Result};

pub type RawQuery = HashMap<String, String>;

/// A validated coordinate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn from_query(query: &RawQuery) -> Result<Self> {
        let latitude = parse_float(query, "latitude")?;
        let longitude = parse_float(query, "longitude")?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ExplorerError::validation(format!(
                "latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ExplorerError::validation(format!(
                "longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// The `city` parameter; may be blank, which the cache treats as no match
pub fn city(query: &RawQuery) -> Result<&str> {
    query
        .get("city")
        .map(String::as_str)
        .ok_or_else(|| ExplorerError::validation("city is required"))
}

/// The 1-based `page` parameter, defaulting to the first page
pub fn page(query: &RawQuery) -> Result<u32> {
    let Some(raw) = query.get("page") else {
        return Ok(1);
    };

    let page = match raw.trim().parse::<u32>() {
        Ok(page) if page >= 1 => page,
        _ => {
            return Err(ExplorerError::validation(format!(
                "page must be a positive integer, got: '{raw}'"
            )));
        }
    };

    if page_offset(page).is_none() {
        return Err(ExplorerError::validation(format!("page {page} is out of range")));
    }
    Ok(page)
}

fn parse_float(query: &RawQuery, name: &str) -> Result<f64> {
    let raw = query
        .get(name)
        .ok_or_else(|| ExplorerError::validation(format!("{name} is required")))?;

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ExplorerError::validation(format!(
            "{name} must be a number, got: '{raw}'"
        ))),
    }
}
