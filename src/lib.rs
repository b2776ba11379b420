//! City Explorer - geographic data aggregator
//!
//! Resolves place names through a persistent geocode cache and relays
//! weather, restaurant and trail searches from third-party providers, each
//! normalized into a stable record shape and served over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use cache::{GeocodeCache, normalize_query};
pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use models::{Location, Restaurant, Trail, Weather};
pub use providers::{Geocoder, ProviderClient};
pub use store::{FjallStore, GeocodeStore, MemoryStore};

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ExplorerError>;
