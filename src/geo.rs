// ABOUTME: Great-circle distance and nearest-spot matching for activity geo-resolution
// ABOUTME: Haversine primitive plus bounded nearest-neighbor over the static spot list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Geographic matching primitives

use crate::models::Spot;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers (haversine)
#[must_use]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Find the nearest spot within `max_distance_km` of the given coordinates.
///
/// Returns `None` when no spot lies inside the radius. Ties resolve to the
/// first spot encountered at the minimum distance.
#[must_use]
pub fn find_nearest_spot(lat: f64, lng: f64, spots: &[Spot], max_distance_km: f64) -> Option<&Spot> {
    let mut nearest = None;
    let mut min_dist = f64::INFINITY;
    for spot in spots {
        let dist = haversine_km(lat, lng, spot.lat, spot.lng);
        if dist < min_dist && dist <= max_distance_km {
            min_dist = dist;
            nearest = Some(spot);
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(id: &str, lat: f64, lng: f64) -> Spot {
        Spot {
            id: id.into(),
            name: id.to_uppercase(),
            lat,
            lng,
        }
    }

    #[test]
    fn test_haversine_zero_distance() {
        assert!(haversine_km(34.0, -118.5, 34.0, -118.5).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_known_pair() {
        // Malibu to Venice Beach, roughly 20 km
        let d = haversine_km(34.0359, -118.6881, 33.985, -118.4695);
        assert!(d > 19.0 && d < 22.0, "got {d}");
    }

    #[test]
    fn test_nearest_spot_within_radius() {
        let spots = vec![spot("a", 34.0, -118.5), spot("b", 36.0, -122.0)];
        let found = find_nearest_spot(34.05, -118.49, &spots, 10.0);
        assert_eq!(found.map(|s| s.id.as_str()), Some("a"));
    }

    #[test]
    fn test_nearest_spot_outside_radius() {
        let spots = vec![spot("a", 34.0, -118.5)];
        assert!(find_nearest_spot(35.0, -118.5, &spots, 10.0).is_none());
    }

    #[test]
    fn test_nearest_spot_prefers_closest() {
        let spots = vec![spot("far", 34.08, -118.5), spot("near", 34.05, -118.5)];
        let found = find_nearest_spot(34.051, -118.5, &spots, 10.0);
        assert_eq!(found.map(|s| s.id.as_str()), Some("near"));
    }
}
