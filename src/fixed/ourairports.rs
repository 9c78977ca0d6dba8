//! Runway reference data from the OurAirports runway split map.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

/// One runway end as published in the split map.
#[derive(Debug, Clone, Deserialize)]
pub struct Runway {
    pub airport_ref: i64,
    pub airport_ident: String,
    pub length_ft: Option<i64>,
    pub width_ft: Option<i64>,
    pub surface: String,
    pub lighted: bool,
    pub closed: bool,
    pub ident: String,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_ft: Option<i64>,
    #[serde(rename = "heading_degT")]
    pub heading_deg_t: Option<i64>,
    pub displaced_threshold_ft: Option<i64>,
}

/// Airport ICAO code to runway-ident map.
pub type RunwayMap = HashMap<String, BTreeMap<String, Runway>>;
