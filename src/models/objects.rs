//! Composite objects written to the versioned store: airports and FIRs
//! decorated with the controllers currently online, plus standalone
//! controller records carrying a map position.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fixed;
use crate::models::feed::Controller;
use crate::models::versioned::{VersionedObject, VersionedPoint};

#[derive(Debug, Clone, Serialize)]
pub struct StoredController {
    #[serde(flatten)]
    pub controller: Controller,
    pub position: VersionedPoint,
}

impl StoredController {
    pub fn new(controller: Controller, position: VersionedPoint) -> Self {
        Self {
            controller,
            position,
        }
    }

    pub fn versioned_object(&self, version: i64) -> VersionedObject<&StoredController> {
        VersionedObject::new(self, version)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AirportControllerSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atis: Option<Controller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Controller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground: Option<Controller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tower: Option<Controller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach: Option<Controller>,
}

impl AirportControllerSet {
    pub fn is_empty(&self) -> bool {
        self.atis.is_none()
            && self.delivery.is_none()
            && self.ground.is_none()
            && self.tower.is_none()
            && self.approach.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Runway {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_ft: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_ft: Option<i64>,
    pub surface: String,
    pub lighted: bool,
    pub closed: bool,
    pub ident: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_ft: Option<i64>,
    #[serde(rename = "heading_degT", skip_serializing_if = "Option::is_none")]
    pub heading_deg_t: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displaced_threshold_ft: Option<i64>,
    pub active_to: bool,
    pub active_lnd: bool,
}

impl From<&fixed::Runway> for Runway {
    fn from(runway: &fixed::Runway) -> Self {
        Self {
            length_ft: runway.length_ft,
            width_ft: runway.width_ft,
            surface: runway.surface.clone(),
            lighted: runway.lighted,
            closed: runway.closed,
            ident: runway.ident.clone(),
            latitude_deg: runway.latitude_deg,
            longitude_deg: runway.longitude_deg,
            elevation_ft: runway.elevation_ft,
            heading_deg_t: runway.heading_deg_t,
            displaced_threshold_ft: runway.displaced_threshold_ft,
            active_to: false,
            active_lnd: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Airport {
    #[serde(flatten)]
    pub fixed: fixed::Airport,
    pub controllers: AirportControllerSet,
    #[serde(rename = "type")]
    pub object_type: String,
    pub runways: BTreeMap<String, Runway>,
}

impl Airport {
    pub fn new(fixed: fixed::Airport) -> Self {
        Self {
            fixed,
            controllers: AirportControllerSet::default(),
            object_type: "airport".to_string(),
            runways: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn versioned_object(&self, version: i64) -> VersionedObject<&Airport> {
        VersionedObject::new(self, version)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Fir {
    #[serde(flatten)]
    pub fixed: fixed::Fir,
    pub controllers: BTreeMap<String, Controller>,
    #[serde(rename = "type")]
    pub object_type: String,
}

impl Fir {
    pub fn new(fixed: fixed::Fir) -> Self {
        Self {
            fixed,
            controllers: BTreeMap::new(),
            object_type: "fir".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn versioned_object(&self, version: i64) -> VersionedObject<&Fir> {
        VersionedObject::new(self, version)
    }
}
