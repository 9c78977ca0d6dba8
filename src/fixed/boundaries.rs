//! FIR boundary polygons from the VATSpy data project's Boundaries.geojson.
//!
//! The geometry itself is passed through verbatim as JSON; only a bounding
//! box and an area-weighted centroid are computed from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundaries {
    pub geometry: Value,
    pub bbox: BoundingBox,
    pub center: Point,
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: FeatureProperties,
    geometry: Value,
}

#[derive(Deserialize)]
struct FeatureProperties {
    id: String,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

/// Parse a GeoJSON feature collection keyed by the feature's `id` property.
pub fn parse_boundaries(raw: &str) -> Result<HashMap<String, Boundaries>> {
    let collection: FeatureCollection = serde_json::from_str(raw)?;

    let mut bounds = HashMap::with_capacity(collection.features.len());
    for feature in collection.features {
        let geometry: Geometry = serde_json::from_value(feature.geometry.clone())
            .map_err(|err| {
                AppError::GeometryError(format!("feature {}: {}", feature.properties.id, err))
            })?;

        let rings = match &geometry {
            Geometry::Polygon { coordinates } => coordinates.iter().collect::<Vec<_>>(),
            Geometry::MultiPolygon { coordinates } => coordinates.iter().flatten().collect(),
        };

        let (bbox, center) = summarize_rings(&feature.properties.id, &rings)?;
        bounds.insert(
            feature.properties.id,
            Boundaries {
                geometry: feature.geometry,
                bbox,
                center,
            },
        );
    }

    Ok(bounds)
}

/// Bounding box over every position, plus the centroid of the ring set.
///
/// Ring areas are signed, so holes wound per RFC 7946 subtract from the
/// centroid accumulation. Degenerate geometry (zero total area) falls back
/// to the mean of all positions.
fn summarize_rings(id: &str, rings: &[&Vec<Vec<f64>>]) -> Result<(BoundingBox, Point)> {
    let mut min_lng = f64::INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lng = f64::NEG_INFINITY;
    let mut max_lat = f64::NEG_INFINITY;

    let mut area_sum = 0.0;
    let mut cx_sum = 0.0;
    let mut cy_sum = 0.0;

    let mut point_count = 0usize;
    let mut lng_sum = 0.0;
    let mut lat_sum = 0.0;

    for ring in rings {
        for position in ring.iter() {
            let [lng, lat] = position_coords(id, position)?;
            min_lng = min_lng.min(lng);
            min_lat = min_lat.min(lat);
            max_lng = max_lng.max(lng);
            max_lat = max_lat.max(lat);
            lng_sum += lng;
            lat_sum += lat;
            point_count += 1;
        }

        let mut ring_area = 0.0;
        let mut ring_cx = 0.0;
        let mut ring_cy = 0.0;
        for window in ring.windows(2) {
            let [x0, y0] = position_coords(id, &window[0])?;
            let [x1, y1] = position_coords(id, &window[1])?;
            let cross = x0 * y1 - x1 * y0;
            ring_area += cross;
            ring_cx += (x0 + x1) * cross;
            ring_cy += (y0 + y1) * cross;
        }

        area_sum += ring_area / 2.0;
        cx_sum += ring_cx / 6.0;
        cy_sum += ring_cy / 6.0;
    }

    if point_count == 0 {
        return Err(AppError::GeometryError(format!("feature {}: empty geometry", id)));
    }

    let center = if area_sum.abs() > f64::EPSILON {
        Point {
            lng: cx_sum / area_sum,
            lat: cy_sum / area_sum,
        }
    } else {
        Point {
            lng: lng_sum / point_count as f64,
            lat: lat_sum / point_count as f64,
        }
    };

    let bbox = BoundingBox {
        min: Point {
            lng: min_lng,
            lat: min_lat,
        },
        max: Point {
            lng: max_lng,
            lat: max_lat,
        },
    };

    Ok((bbox, center))
}

fn position_coords(id: &str, position: &[f64]) -> Result<[f64; 2]> {
    if position.len() < 2 {
        return Err(AppError::GeometryError(format!(
            "feature {}: position with {} coordinates",
            id,
            position.len()
        )));
    }
    Ok([position[0], position[1]])
}
