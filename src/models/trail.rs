//! Trail search record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::providers::hiking_project::TrailSummary;

/// A hiking trail near a coordinate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Trail {
    pub name: Option<String>,
    pub location: Option<String>,
    pub length: Option<f64>,
    pub stars: Option<f64>,
    pub star_votes: Option<i64>,
    pub summary: Option<String>,
    pub trail_url: Option<String>,
    pub conditions: Option<String>,
    pub condition_date: Option<NaiveDate>,
    pub condition_time: Option<String>,
}

impl From<&TrailSummary> for Trail {
    fn from(trail: &TrailSummary) -> Self {
        let (condition_date, condition_time) = trail
            .condition_date
            .as_deref()
            .map(split_timestamp)
            .unwrap_or((None, None));

        Self {
            name: trail.name.clone(),
            location: trail.location.clone(),
            length: trail.length,
            stars: trail.stars,
            star_votes: trail.star_votes,
            summary: trail.summary.clone(),
            trail_url: trail.url.clone(),
            conditions: trail.condition_status.clone(),
            condition_date,
            condition_time,
        }
    }
}

/// Split `YYYY-MM-DD HH:MM:SS` into its date and time halves
fn split_timestamp(raw: &str) -> (Option<NaiveDate>, Option<String>) {
    let mut parts = raw.trim().splitn(2, ' ');
    let date = parts
        .next()
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok());
    let time = parts
        .next()
        .map(str::trim)
        .filter(|time| !time.is_empty())
        .map(str::to_string);
    (date, time)
}
