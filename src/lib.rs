//! vsfetch - mirrors the live VATSIM network state into a tracked-point
//! service and a versioned object store.
//!
//! The daemon polls the VATSIM data feed, turns pilots into track points and
//! versioned objects, enriches controllers with VATSpy and OurAirports
//! reference data, and prunes downstream keys that left the network.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod fixed;
pub mod infrastructure;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

/// Shared handles threaded through the fetch pipeline.
#[derive(Clone)]
pub struct AppState {
    pub env: Arc<config::Config>,
    pub http: Arc<infrastructure::HttpClient>,
    pub fixed: Arc<fixed::FixedStore>,
    pub runways: Arc<fixed::RunwayStore>,
    pub publisher: Arc<services::Publisher>,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Self> {
        let env = Arc::new(config);
        let http = Arc::new(infrastructure::HttpClient::new(
            env.external.timeout_duration(),
        )?);
        let fixed = Arc::new(fixed::FixedStore::new(http.clone(), &env));
        let runways = Arc::new(fixed::RunwayStore::new(http.clone(), &env));
        let publisher = Arc::new(services::Publisher::new(http.clone(), &env));
        Ok(Self {
            env,
            http,
            fixed,
            runways,
            publisher,
        })
    }
}
