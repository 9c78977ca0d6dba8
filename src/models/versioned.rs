use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedRect {
    pub min: VersionedPoint,
    pub max: VersionedPoint,
}

/// Envelope for every record written to the versioned store. Spatial hints
/// are optional and omitted from the payload when absent.
#[derive(Debug, Clone, Serialize)]
pub struct VersionedObject<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<VersionedPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rect: Option<VersionedRect>,
    pub version: i64,
}

impl<T> VersionedObject<T> {
    pub fn new(data: T, version: i64) -> Self {
        Self {
            data,
            point: None,
            rect: None,
            version,
        }
    }

    pub fn with_point(data: T, point: VersionedPoint, version: i64) -> Self {
        Self {
            data,
            point: Some(point),
            rect: None,
            version,
        }
    }
}
