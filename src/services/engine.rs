//! Snapshot processing and the forever loop around it.

use tracing::{debug, error};

use crate::error::Result;
use crate::models::{feed_timestamp_ms, DataFeed};
use crate::services::enrich::assemble_controllers;
use crate::AppState;

pub struct Engine {
    state: AppState,
}

impl Engine {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Fetch one feed snapshot and push everything derived from it.
    ///
    /// Returns the snapshot's version. A snapshot that is not strictly newer
    /// than `prev_version` is skipped and `prev_version` comes back
    /// unchanged.
    pub async fn process(&self, prev_version: Option<i64>) -> Result<i64> {
        let source = &self.state.env.source;
        debug!("fetching data from {}", source.data_url);
        let feed: DataFeed = self
            .state
            .http
            .get_json(&source.data_url, Some(self.state.env.external.timeout_duration()))
            .await?;

        let version = feed_timestamp_ms(&feed.general.update_timestamp)?;
        if let Some(prev) = stale_version(prev_version, version) {
            debug!("previous data version is the same or fresher, skipping");
            return Ok(prev);
        }

        self.state.publisher.store_track(&feed.pilots, version).await;
        self.state.publisher.store_pilots(&feed.pilots, version).await?;

        let fixed = self.state.fixed.get().await?;
        let runways = self.state.runways.get().await?;
        let controllers = assemble_controllers(&fixed, &runways, feed.controllers, feed.atis);
        self.state.publisher.store_controllers(&controllers, version).await?;

        Ok(version)
    }

    /// Poll forever. A failed cycle is logged and retried after a back-off
    /// sleep; the process never exits on its own.
    pub async fn run(&self) {
        let source = &self.state.env.source;
        let mut version: Option<i64> = None;
        loop {
            let new_version = match self.process(version).await {
                Ok(new_version) => new_version,
                Err(err) => {
                    error!(
                        "error processing version {:?}: {}, sleeping for {} seconds",
                        version, err, source.retry_interval_secs
                    );
                    tokio::time::sleep(source.retry_interval()).await;
                    continue;
                }
            };

            if Some(new_version) == version {
                debug!(
                    "no new data, sleeping for {} seconds",
                    source.idle_interval_secs
                );
                tokio::time::sleep(source.idle_interval()).await;
            } else {
                version = Some(new_version);
                debug!(
                    "data processed, sleeping for {} seconds",
                    source.poll_interval_secs
                );
                tokio::time::sleep(source.poll_interval()).await;
            }
        }
    }
}

/// Returns the version to keep when the fetched snapshot is not strictly
/// newer than the last processed one.
fn stale_version(prev_version: Option<i64>, version: i64) -> Option<i64> {
    prev_version.filter(|&prev| version <= prev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_snapshot_is_processed() {
        assert_eq!(stale_version(None, 1_700_000_000_000), None);
    }

    #[test]
    fn test_older_or_equal_snapshot_is_skipped() {
        assert_eq!(
            stale_version(Some(1_700_000_000_000), 1_700_000_000_000),
            Some(1_700_000_000_000)
        );
        assert_eq!(
            stale_version(Some(1_700_000_000_000), 1_699_999_999_999),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_newer_snapshot_is_processed() {
        assert_eq!(stale_version(Some(1_700_000_000_000), 1_700_000_010_000), None);
    }
}
