//! Payload shapes of the VATSIM data feed.

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::models::track::{TrackObject, TrackPoint};
use crate::models::versioned::{VersionedObject, VersionedPoint};

/// Parses a feed timestamp (RFC 3339 with up to seven fractional digits)
/// into epoch milliseconds, rounding sub-millisecond fractions.
pub fn feed_timestamp_ms(value: &str) -> Result<i64> {
    let parsed = DateTime::parse_from_rfc3339(value)?;
    Ok((parsed.timestamp_micros() + 500).div_euclid(1000))
}

fn de_timestamp_ms<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    feed_timestamp_ms(&raw).map_err(serde::de::Error::custom)
}

/// ATIS text arrives either as a single string or as a list of lines.
fn de_text_atis<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextAtis {
        Line(String),
        Lines(Vec<String>),
    }

    Ok(Option::<TextAtis>::deserialize(deserializer)?.map(|value| match value {
        TextAtis::Line(line) => line,
        TextAtis::Lines(lines) => lines.join("\n"),
    }))
}

fn pilot_object_type() -> String {
    "pilot".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataFeed {
    pub general: GeneralInfo,
    pub pilots: Vec<Pilot>,
    pub controllers: Vec<Controller>,
    pub atis: Vec<Controller>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralInfo {
    pub update_timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pilot {
    pub cid: i64,
    pub name: String,
    pub callsign: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: i64,
    pub groundspeed: i64,
    pub transponder: String,
    pub heading: i64,
    pub qnh_i_hg: f64,
    pub qnh_mb: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_plan: Option<FlightPlan>,
    /// Logon time converted to epoch milliseconds.
    #[serde(deserialize_with = "de_timestamp_ms")]
    pub logon_time: i64,
    #[serde(rename = "type", default = "pilot_object_type")]
    pub object_type: String,
}

impl Pilot {
    pub fn track_id(&self) -> String {
        format!("{}.{}.{}", self.callsign, self.cid, self.logon_time)
    }

    pub fn track_object(&self, ts: i64) -> TrackObject {
        TrackObject {
            track_id: self.track_id(),
            point: TrackPoint {
                ts,
                lat: self.latitude,
                lng: self.longitude,
                hdg: self.heading,
                alt: self.altitude,
                gs: self.groundspeed,
            },
        }
    }

    pub fn versioned_object(&self, version: i64) -> VersionedObject<&Pilot> {
        VersionedObject::with_point(
            self,
            VersionedPoint {
                lat: self.latitude,
                lng: self.longitude,
            },
            version,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightPlan {
    pub flight_rules: String,
    pub aircraft: String,
    pub aircraft_faa: String,
    pub aircraft_short: String,
    pub departure: String,
    pub arrival: String,
    pub alternate: String,
    pub cruise_tas: String,
    pub altitude: String,
    pub deptime: String,
    pub enroute_time: String,
    pub fuel_time: String,
    pub remarks: String,
    pub route: String,
    pub revision_id: i64,
    pub assigned_transponder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Controller {
    pub cid: i64,
    pub name: String,
    pub callsign: String,
    pub frequency: String,
    pub facility: i64,
    pub visual_range: i64,
    #[serde(
        default,
        deserialize_with = "de_text_atis",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_atis: Option<String>,
    pub logon_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_readable: Option<String>,
}
