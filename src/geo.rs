//! Distance formulas for the geo filters
//!
//! Two metrics are supported and the choice is explicit in [`Config`]:
//! - `Planar`: Euclidean distance in raw degree space. This is the flat-plane
//!   approximation masters have always been served, so the radius is in degrees.
//! - `Haversine`: great-circle distance in kilometres.
//!
//! [`Config`]: crate::config::Config

use std::fmt;
use std::str::FromStr;

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance formula used when filtering stores by radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Flat-plane distance in degrees
    #[default]
    Planar,

    /// Great-circle distance in kilometres
    Haversine,
}

impl DistanceMetric {
    /// Distance between two (latitude, longitude) points in this metric's unit
    pub fn distance(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        match self {
            DistanceMetric::Planar => planar_distance(lat1, lon1, lat2, lon2),
            DistanceMetric::Haversine => haversine_km(lat1, lon1, lat2, lon2),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Planar => f.write_str("planar"),
            DistanceMetric::Haversine => f.write_str("haversine"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planar" => Ok(DistanceMetric::Planar),
            "haversine" => Ok(DistanceMetric::Haversine),
            other => Err(format!("unknown distance metric '{other}' (expected planar or haversine)")),
        }
    }
}

/// Euclidean distance treating latitude/longitude as plane coordinates
pub fn planar_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    ((lat1 - lat2).powi(2) + (lon1 - lon2).powi(2)).sqrt()
}

/// Great-circle distance in kilometres (haversine formula)
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
