//! Client side of the two downstream stores.
//!
//! The tracked service receives batched track points; the versioned store
//! receives keyed object maps followed by a pruning pass that tombstones
//! keys absent from the current snapshot.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::HttpClient;
use crate::models::Pilot;
use crate::services::enrich::ControllerState;

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct KeysResponse {
    keys: Vec<String>,
}

#[derive(Serialize)]
struct BatchRequest<T> {
    data: T,
}

pub struct Publisher {
    http: Arc<HttpClient>,
    tracked_url: String,
    tracked_timeout: Duration,
    versioned_url: String,
    versioned_timeout: Duration,
}

impl Publisher {
    pub fn new(http: Arc<HttpClient>, config: &Config) -> Self {
        Self {
            http,
            tracked_url: config.tracked.base_url.clone(),
            tracked_timeout: config.tracked.timeout_duration(),
            versioned_url: config.versioned.base_url.clone(),
            versioned_timeout: config.versioned.timeout_duration(),
        }
    }

    /// Append one track point per pilot. A failure here only loses a single
    /// sample, so it is logged and swallowed.
    pub async fn store_track(&self, pilots: &[Pilot], version: i64) {
        let started = Instant::now();
        let objects: Vec<_> = pilots
            .iter()
            .map(|pilot| pilot.track_object(version))
            .collect();
        let url = format!("{}/api/v1/tracks/", self.tracked_url);
        debug!("storing track data to {}", url);

        let request = BatchRequest { data: objects };
        match self
            .http
            .post_json::<_, StatusResponse>(&url, &request, Some(self.tracked_timeout))
            .await
        {
            Ok(response) => info!(
                "track data stored in {:.3}s status: {}",
                started.elapsed().as_secs_f64(),
                response.status
            ),
            Err(err) => error!("{}", err),
        }
    }

    /// Upsert `pilot:<callsign>` objects, then prune pilots that left.
    pub async fn store_pilots(&self, pilots: &[Pilot], version: i64) -> Result<()> {
        let started = Instant::now();
        let object_map: BTreeMap<String, _> = pilots
            .iter()
            .map(|pilot| {
                (
                    format!("pilot:{}", pilot.callsign),
                    pilot.versioned_object(version),
                )
            })
            .collect();
        let keys: HashSet<String> = object_map.keys().cloned().collect();

        let url = format!("{}/api/v1/objects/", self.versioned_url);
        debug!("storing pilots data to {}", url);
        let request = BatchRequest { data: object_map };
        match self
            .http
            .post_json::<_, StatusResponse>(&url, &request, Some(self.versioned_timeout))
            .await
        {
            Ok(response) => info!(
                "versioned pilots stored in {:.3}s status: {}",
                started.elapsed().as_secs_f64(),
                response.status
            ),
            Err(err) => {
                error!("{}", err);
                return Ok(());
            }
        }

        self.delete_old_keys("pilot:", &keys, version).await
    }

    /// Upsert the airport, FIR and standalone controller objects derived
    /// from one snapshot, then prune each key prefix.
    pub async fn store_controllers(&self, state: &ControllerState, version: i64) -> Result<()> {
        let started = Instant::now();

        let airport_map: BTreeMap<String, _> = state
            .airports
            .values()
            .map(|airport| {
                (
                    format!("airport:{}", airport.fixed.icao),
                    airport.versioned_object(version),
                )
            })
            .collect();
        let fir_map: BTreeMap<String, _> = state
            .firs
            .values()
            .map(|fir| (format!("fir:{}", fir.fixed.icao), fir.versioned_object(version)))
            .collect();
        let ctrl_map: BTreeMap<String, _> = state
            .controllers
            .values()
            .map(|ctrl| {
                (
                    format!("ctrl:{}", ctrl.controller.callsign),
                    ctrl.versioned_object(version),
                )
            })
            .collect();

        let airport_keys: HashSet<String> = airport_map.keys().cloned().collect();
        let fir_keys: HashSet<String> = fir_map.keys().cloned().collect();
        let ctrl_keys: HashSet<String> = ctrl_map.keys().cloned().collect();

        let url = format!("{}/api/v1/objects/", self.versioned_url);

        debug!("storing airport data to {}", url);
        let airport_response: StatusResponse = self
            .http
            .post_json(&url, &BatchRequest { data: airport_map }, Some(self.versioned_timeout))
            .await?;

        debug!("storing fir data to {}", url);
        let fir_response: StatusResponse = self
            .http
            .post_json(&url, &BatchRequest { data: fir_map }, Some(self.versioned_timeout))
            .await?;

        debug!("storing pure controllers to {}", url);
        let ctrl_response: StatusResponse = self
            .http
            .post_json(&url, &BatchRequest { data: ctrl_map }, Some(self.versioned_timeout))
            .await?;

        info!(
            "versioned airports stored in {:.3}s",
            started.elapsed().as_secs_f64()
        );
        debug!("airport store status: {}", airport_response.status);
        debug!("fir store status: {}", fir_response.status);
        debug!("pure ctrl store status: {}", ctrl_response.status);

        self.delete_old_keys("airport:", &airport_keys, version).await?;
        self.delete_old_keys("fir:", &fir_keys, version).await?;
        self.delete_old_keys("ctrl:", &ctrl_keys, version).await?;
        Ok(())
    }

    /// Tombstone every downstream key with the given prefix that the current
    /// snapshot no longer contains.
    async fn delete_old_keys(
        &self,
        prefix: &str,
        new_keys: &HashSet<String>,
        version: i64,
    ) -> Result<()> {
        let started = Instant::now();
        debug!(
            "collecting existing keys with prefix \"{}\" from versioned db",
            prefix
        );
        let url = format!("{}/api/v1/keys/?prefix={}", self.versioned_url, prefix);
        let response: KeysResponse = self
            .http
            .get_json(&url, Some(self.versioned_timeout))
            .await?;

        let keys: HashSet<String> = response.keys.into_iter().collect();
        let keys_to_remove = stale_keys(&keys, new_keys);
        debug!(
            "keys in db {}, number of keys to remove {}",
            keys.len(),
            keys_to_remove.len()
        );

        if !keys_to_remove.is_empty() {
            let request = json!({
                "data": keys_to_remove
                    .iter()
                    .map(|key| json!({"key": key}))
                    .collect::<Vec<_>>(),
                "version": version,
            });
            let url = format!("{}/api/v1/objects/", self.versioned_url);
            let response: StatusResponse = self
                .http
                .delete_json(&url, Some(&request), Some(self.versioned_timeout))
                .await?;
            debug!("{} in {:.3}s", response.status, started.elapsed().as_secs_f64());
        }

        Ok(())
    }
}

/// Keys present downstream but absent from the current snapshot.
fn stale_keys(existing: &HashSet<String>, live: &HashSet<String>) -> Vec<String> {
    existing.difference(live).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_stale_keys_difference() {
        let existing = set(&["pilot:KLM33X", "pilot:BAW212", "pilot:DLH4CK"]);
        let live = set(&["pilot:KLM33X", "pilot:AFR1680"]);

        let mut stale = stale_keys(&existing, &live);
        stale.sort();
        assert_eq!(stale, vec!["pilot:BAW212", "pilot:DLH4CK"]);
    }

    #[test]
    fn test_stale_keys_empty_when_all_live() {
        let existing = set(&["ctrl:EHAM_TWR"]);
        let live = set(&["ctrl:EHAM_TWR", "ctrl:EHAA_CTR"]);
        assert!(stale_keys(&existing, &live).is_empty());
    }
}
