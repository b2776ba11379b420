use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;

use crate::{
    Result,
    cache::GeocodeCache,
    models::{Location, Restaurant, Trail, Weather},
    providers::ProviderClient,
};

pub mod params;

use params::{Coordinates, RawQuery};

pub const BANNER: &str = "City Explorer App";
pub const NOT_FOUND_MESSAGE: &str = "That page does not exist.";

/// Shared handles for every request
#[derive(Clone)]
pub struct AppState {
    pub locations: Arc<GeocodeCache>,
    pub providers: Arc<ProviderClient>,
}

impl AppState {
    pub fn new(locations: GeocodeCache, providers: ProviderClient) -> Self {
        Self {
            locations: Arc::new(locations),
            providers: Arc::new(providers),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    #[serde(rename = "notFound")]
    pub not_found: bool,
    pub message: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/location", get(get_location))
        .route("/weather", get(get_weather))
        .route("/yelp", get(get_restaurants))
        .route("/trails", get(get_trails))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
}

async fn root() -> &'static str {
    BANNER
}

async fn get_location(
    State(state): State<AppState>,
    Query(query): Query<RawQuery>,
) -> Result<Json<Location>> {
    let city = params::city(&query)?;
    let location = state.locations.resolve(city).await?;
    Ok(Json(location))
}

async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<RawQuery>,
) -> Result<Json<Vec<Weather>>> {
    let coords = Coordinates::from_query(&query)?;
    let days = state
        .providers
        .daily_forecast(coords.latitude, coords.longitude)
        .await?;
    Ok(Json(days.iter().map(Weather::from).collect()))
}

async fn get_restaurants(
    State(state): State<AppState>,
    Query(query): Query<RawQuery>,
) -> Result<Json<Vec<Restaurant>>> {
    let coords = Coordinates::from_query(&query)?;
    let page = params::page(&query)?;
    let businesses = state
        .providers
        .search_restaurants(coords.latitude, coords.longitude, page)
        .await?;
    Ok(Json(businesses.iter().map(Restaurant::from).collect()))
}

async fn get_trails(
    State(state): State<AppState>,
    Query(query): Query<RawQuery>,
) -> Result<Json<Vec<Trail>>> {
    let coords = Coordinates::from_query(&query)?;
    let trails = state
        .providers
        .search_trails(coords.latitude, coords.longitude)
        .await?;
    Ok(Json(trails.iter().map(Trail::from).collect()))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            not_found: true,
            message: NOT_FOUND_MESSAGE,
        }),
    )
}
