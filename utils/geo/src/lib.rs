//! Plain-float geographic helpers.
//!
//! Coordinates are degrees (WGS84-like), distances are kilometers. Nothing here
//! validates its input: NaN or out-of-range degrees yield NaN or meaningless
//! results.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometers.
///
/// Symmetric in its arguments and zero for identical points.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    // rounding can push `a` a hair above 1.0 for antipodal points
    EARTH_RADIUS_KM * 2.0 * a.sqrt().min(1.0).asin()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Point {
            latitude,
            longitude,
        }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Latitude/longitude rectangle, inclusive on all four bounds.
///
/// Does not wrap around the antimeridian: `min_lng > max_lng` contains nothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &Point) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lng..=self.max_lng).contains(&point.longitude)
    }
}

/// Area a point set is filtered against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Area {
    /// Points whose great-circle distance to `center` is at most `radius_km`.
    Circle { center: Point, radius_km: f64 },
    Rectangle(BoundingBox),
}

impl Area {
    pub fn contains(&self, point: &Point) -> bool {
        match self {
            Area::Circle { center, radius_km } => center.distance_to(point) <= *radius_km,
            Area::Rectangle(bbox) => bbox.contains(point),
        }
    }
}
