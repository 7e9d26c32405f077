//! Path and query parameters.

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct BuildingId {
    pub building_id: i32,
}

#[derive(Deserialize, Debug)]
pub struct ActivityId {
    pub activity_id: i32,
}

#[derive(Deserialize, Debug)]
pub struct OrganizationId {
    pub organization_id: i32,
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    pub name: Option<String>,
}

/// Either a center with `radius_km`, or all four rectangle bounds.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct NearbyParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
    pub min_lng: Option<f64>,
    pub max_lng: Option<f64>,
}
