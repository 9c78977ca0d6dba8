//! Static reference data: the VATSpy dataset (countries, airports, FIRs,
//! UIRs, FIR boundaries) and the OurAirports runway map.
//!
//! Both stores fetch on first use and cache the parsed result behind an
//! `RwLock`; `reload` replaces the cached snapshot atomically.

pub mod boundaries;
pub mod ourairports;
pub mod vatspy;

pub use boundaries::{Boundaries, BoundingBox, Point};
pub use ourairports::{Runway, RunwayMap};
pub use vatspy::{Airport, Country, Fir, Uir, VatspyData};

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::HttpClient;

pub struct FixedStore {
    http: Arc<HttpClient>,
    fixed_data_url: String,
    boundaries_url: String,
    timeout: Duration,
    data: RwLock<Option<Arc<VatspyData>>>,
}

impl FixedStore {
    pub fn new(http: Arc<HttpClient>, config: &Config) -> Self {
        Self {
            http,
            fixed_data_url: config.source.fixed_data_url.clone(),
            boundaries_url: config.source.boundaries_url.clone(),
            timeout: config.external.timeout_duration(),
            data: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> Result<Arc<VatspyData>> {
        if let Some(data) = self.data.read().await.as_ref() {
            return Ok(data.clone());
        }
        self.reload().await
    }

    pub async fn reload(&self) -> Result<Arc<VatspyData>> {
        debug!("loading and parsing boundaries from {}", self.boundaries_url);
        let started = Instant::now();
        let raw = self
            .http
            .get_text(&self.boundaries_url, Some(self.timeout))
            .await?;
        let bounds = boundaries::parse_boundaries(&raw)?;
        debug!("boundaries parsed in {:.3}s", started.elapsed().as_secs_f64());

        debug!("loading fixed data from {}", self.fixed_data_url);
        let text = self
            .http
            .get_text(&self.fixed_data_url, Some(self.timeout))
            .await?;
        let data = Arc::new(VatspyData::parse(&text, &bounds)?);

        *self.data.write().await = Some(data.clone());
        Ok(data)
    }
}

pub struct RunwayStore {
    http: Arc<HttpClient>,
    runways_url: String,
    timeout: Duration,
    data: RwLock<Option<Arc<RunwayMap>>>,
}

impl RunwayStore {
    pub fn new(http: Arc<HttpClient>, config: &Config) -> Self {
        Self {
            http,
            runways_url: config.source.runways_url.clone(),
            timeout: config.external.timeout_duration(),
            data: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> Result<Arc<RunwayMap>> {
        if let Some(data) = self.data.read().await.as_ref() {
            return Ok(data.clone());
        }
        self.reload().await
    }

    pub async fn reload(&self) -> Result<Arc<RunwayMap>> {
        debug!("loading runway map from {}", self.runways_url);
        let map: RunwayMap = self
            .http
            .get_json(&self.runways_url, Some(self.timeout))
            .await?;
        let map = Arc::new(map);
        *self.data.write().await = Some(map.clone());
        Ok(map)
    }
}
