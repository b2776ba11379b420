//! Daily weather forecast record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::providers::weatherbit::ForecastDay;

/// Human-readable day format, e.g. `Wed Jan 01 2020`
const DAY_FORMAT: &str = "%a %b %d %Y";

/// One forecast day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Weather {
    pub forecast: Option<String>,
    pub time: Option<String>,
}

impl From<&ForecastDay> for Weather {
    fn from(day: &ForecastDay) -> Self {
        Self {
            forecast: day
                .weather
                .as_ref()
                .and_then(|weather| weather.description.clone()),
            time: day.valid_date.as_deref().map(format_day),
        }
    }
}

/// Render a provider date as a day string; unparseable input passes through
fn format_day(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format(DAY_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string())
}
