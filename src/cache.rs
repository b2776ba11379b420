//! Geocode cache
//!
//! Cache-aside lookups for place names: normalize the query, read the store,
//! and on a miss geocode through the provider and persist the top match.
//!
//! With single-flight enabled, misses for the same key are serialized behind
//! a per-key gate and the store is re-checked once the gate is held, so
//! concurrent misses cost one provider call and one write. Without it, two
//! concurrent misses may both call the provider and both write the row.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, instrument, warn};

use crate::models::Location;
use crate::providers::Geocoder;
use crate::store::GeocodeStore;
use crate::{ExplorerError, Result};

type Gate = Arc<tokio::sync::Mutex<()>>;

/// Lower-case and trim a raw place name into its cache key
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Read-through cache of geocoded locations
pub struct GeocodeCache {
    store: Arc<dyn GeocodeStore>,
    geocoder: Arc<dyn Geocoder>,
    gates: Option<Mutex<HashMap<String, Gate>>>,
}

impl GeocodeCache {
    /// Create a cache without miss de-duplication
    pub fn new(store: Arc<dyn GeocodeStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            store,
            geocoder,
            gates: None,
        }
    }

    /// Create a cache that collapses concurrent misses per key
    pub fn with_single_flight(store: Arc<dyn GeocodeStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            store,
            geocoder,
            gates: Some(Mutex::new(HashMap::new())),
        }
    }

    /// Resolve a raw place name to a location
    #[instrument(skip(self))]
    pub async fn resolve(&self, raw_query: &str) -> Result<Location> {
        let key = normalize_query(raw_query);
        if key.is_empty() {
            return Err(ExplorerError::no_results(key));
        }

        if let Some(location) = self.store.get(&key).await? {
            debug!("Cache hit for '{}'", key);
            return Ok(location);
        }

        debug!("Cache miss for '{}'", key);
        match &self.gates {
            Some(gates) => self.populate_single_flight(gates, &key).await,
            None => self.populate(&key).await,
        }
    }

    async fn populate_single_flight(
        &self,
        gates: &Mutex<HashMap<String, Gate>>,
        key: &str,
    ) -> Result<Location> {
        // Declared before the guard so the guard drops first, on return or cancellation.
        let lease = GateLease::acquire(gates, key);
        let _held = lease.gate.lock().await;

        // Another caller may have populated the row while we waited.
        if let Some(location) = self.store.get(key).await? {
            debug!("Row for '{}' populated by a concurrent request", key);
            return Ok(location);
        }
        self.populate(key).await
    }

    /// Geocode, persist and return the top match for a normalized key
    async fn populate(&self, key: &str) -> Result<Location> {
        let matches = self.geocoder.geocode(key).await?;

        let Some(top) = matches.first() else {
            warn!("Provider returned no matches for '{}'", key);
            return Err(ExplorerError::no_results(key));
        };

        let location = Location::from_match(key, top)?;
        self.store.put(&location).await?;
        info!("Cached '{}' at ({})", key, location.format_coordinates());
        Ok(location)
    }

    /// Number of keys with an in-flight populate
    #[cfg(test)]
    fn gates_in_use(&self) -> usize {
        self.gates
            .as_ref()
            .map(|gates| lock_gates(gates).len())
            .unwrap_or_default()
    }
}

fn lock_gates(
    gates: &Mutex<HashMap<String, Gate>>,
) -> std::sync::MutexGuard<'_, HashMap<String, Gate>> {
    gates.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A handle on one key's gate, released from the table when dropped
struct GateLease<'a> {
    gates: &'a Mutex<HashMap<String, Gate>>,
    key: String,
    gate: Gate,
}

impl<'a> GateLease<'a> {
    fn acquire(gates: &'a Mutex<HashMap<String, Gate>>, key: &str) -> Self {
        let gate = lock_gates(gates).entry(key.to_string()).or_default().clone();
        Self {
            gates,
            key: key.to_string(),
            gate,
        }
    }
}

impl Drop for GateLease<'_> {
    fn drop(&mut self) {
        let mut gates = lock_gates(self.gates);
        // Handles are only cloned under this lock, so the count cannot race.
        // Two handles left means the table's and ours.
        if Arc::strong_count(&self.gate) == 2 {
            gates.remove(&self.key);
        }
    }
}
