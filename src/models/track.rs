use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPoint {
    pub ts: i64,
    pub lat: f64,
    pub lng: f64,
    pub hdg: i64,
    pub alt: i64,
    pub gs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackObject {
    pub track_id: String,
    pub point: TrackPoint,
}
