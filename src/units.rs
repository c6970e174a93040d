// ABOUTME: Pure numeric unit conversions for ocean condition data
// ABOUTME: Distance, speed, temperature, and angle-to-compass helpers with no dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Unit conversions for condition readings

/// Sixteen-point compass rose, clockwise from north
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Convert meters to feet
#[must_use]
pub fn meters_to_feet(m: f64) -> f64 {
    m * 3.28084
}

/// Convert meters per second to knots
#[must_use]
pub fn ms_to_knots(ms: f64) -> f64 {
    ms * 1.94384
}

/// Convert Celsius to Fahrenheit
#[must_use]
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

/// Convert degrees to a compass direction (e.g. 225.0 -> "SW").
///
/// Negative and >360 inputs are normalized onto the rose first.
#[must_use]
pub fn degrees_to_compass(deg: f64) -> &'static str {
    let normalized = (deg % 360.0 + 360.0) % 360.0;
    let idx = ((normalized / 22.5).round() as usize) % 16;
    COMPASS_POINTS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_feet() {
        assert!((meters_to_feet(1.0) - 3.28084).abs() < 1e-9);
        assert!((meters_to_feet(0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_ms_to_knots() {
        assert!((ms_to_knots(10.0) - 19.4384).abs() < 1e-6);
    }

    #[test]
    fn test_degrees_to_compass_cardinals() {
        assert_eq!(degrees_to_compass(0.0), "N");
        assert_eq!(degrees_to_compass(90.0), "E");
        assert_eq!(degrees_to_compass(180.0), "S");
        assert_eq!(degrees_to_compass(225.0), "SW");
        assert_eq!(degrees_to_compass(270.0), "W");
    }

    #[test]
    fn test_degrees_to_compass_wraps() {
        assert_eq!(degrees_to_compass(360.0), "N");
        assert_eq!(degrees_to_compass(-90.0), "W");
        assert_eq!(degrees_to_compass(725.0), "N");
    }
}
