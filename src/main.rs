use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use city_explorer::{
    AppState, ExplorerConfig, FjallStore, GeocodeCache, ProviderClient, logging, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ExplorerConfig::load_from_path(Some(PathBuf::from(path)))?,
        None => ExplorerConfig::load()?,
    };

    logging::init(&config.logging)?;

    for provider in config.providers_missing_keys() {
        tracing::warn!("No API key configured for the {} provider", provider);
    }

    // No partial-availability mode: the service does not start without its store.
    let store = FjallStore::open(&config.store.path).with_context(|| {
        format!(
            "Failed to open geocode store at {}",
            config.store.path.display()
        )
    })?;
    tracing::info!("Opened geocode store at {}", config.store.path.display());

    let providers = ProviderClient::new(config.providers.clone())?;
    let geocoder = Arc::new(providers.clone());
    let store = Arc::new(store);
    let locations = if config.cache.single_flight {
        GeocodeCache::with_single_flight(store, geocoder)
    } else {
        GeocodeCache::new(store, geocoder)
    };

    let state = AppState::new(locations, providers);
    web::run(&config.server, state).await
}
