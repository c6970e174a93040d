// ABOUTME: Deterministic 0-6 surf quality rating from wave height, wind vector, and swell period
// ABOUTME: Band table lookup composed with independent wind and period adjustments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Condition rating engine
//!
//! Converts a reading of wave height (ft), wind speed (kt), wind direction,
//! swell direction, and swell period (s) into a discrete 0-6 quality level
//! with a display label and color. Longer-period swells with offshore wind
//! rate higher than short-period chop with onshore wind.
//!
//! The pipeline is three independently testable steps: band lookup from
//! wave height, wind adjustment, period adjustment. Each step clamps to
//! [0, 6], and the final label/color come from indexing the band table with
//! the post-adjustment ordinal level.

use serde::Serialize;

/// One row of the fixed rating scale
#[derive(Debug, Clone, Copy)]
pub struct RatingBand {
    /// Ordinal level, 0 (flat) through 6 (epic)
    pub level: u8,
    /// Display label
    pub label: &'static str,
    /// Display color (hex)
    pub color: &'static str,
    /// Wave height lower bound in feet, inclusive
    pub min_ft: f64,
    /// Wave height upper bound in feet, exclusive
    pub max_ft: f64,
}

/// The fixed rating scale, ordered by level
pub const RATING_BANDS: [RatingBand; 7] = [
    RatingBand { level: 0, label: "FLAT", color: "#8E8E8E", min_ft: 0.0, max_ft: 0.5 },
    RatingBand { level: 1, label: "VERY POOR", color: "#D32F2F", min_ft: 0.5, max_ft: 1.0 },
    RatingBand { level: 2, label: "POOR", color: "#F57C00", min_ft: 1.0, max_ft: 2.0 },
    RatingBand { level: 3, label: "POOR-FAIR", color: "#FBC02D", min_ft: 2.0, max_ft: 3.0 },
    RatingBand { level: 4, label: "FAIR", color: "#689F38", min_ft: 3.0, max_ft: 4.0 },
    RatingBand { level: 5, label: "GOOD", color: "#1976D2", min_ft: 4.0, max_ft: 6.0 },
    RatingBand { level: 6, label: "EPIC", color: "#7B1FA2", min_ft: 6.0, max_ft: f64::INFINITY },
];

/// Final rating value object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rating {
    /// Ordinal level 0-6
    pub level: u8,
    /// Display label from the band table
    pub label: &'static str,
    /// Display color (hex) from the band table
    pub color: &'static str,
}

/// Base level from the wave-height band table.
///
/// Bands are half-open, lower-inclusive: a height exactly on a boundary
/// belongs to the upper band. Heights below zero land in band 0.
#[must_use]
pub fn base_level(wave_height_ft: f64) -> u8 {
    RATING_BANDS
        .iter()
        .find(|b| wave_height_ft >= b.min_ft && wave_height_ft < b.max_ft)
        .map_or(0, |b| b.level)
}

/// Absolute angular difference between two bearings, normalized to [0, 180]
fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Wind adjustment: light offshore wind bumps the level up, strong onshore
/// wind bumps it down.
///
/// Applied only when wind speed, wind direction, and swell direction are all
/// known; any missing input skips the adjustment. Offshore means the wind
/// blows opposite to the swell's travel (difference above 135 degrees).
#[must_use]
pub fn wind_adjustment(
    level: u8,
    wind_knots: Option<f64>,
    wind_dir_deg: Option<f64>,
    swell_dir_deg: Option<f64>,
) -> u8 {
    let (Some(speed), Some(wind_dir), Some(swell_dir)) = (wind_knots, wind_dir_deg, swell_dir_deg)
    else {
        return level;
    };

    let diff = angular_difference(wind_dir, swell_dir);
    if diff > 135.0 && speed < 15.0 {
        (level + 1).min(6)
    } else if diff < 45.0 && speed > 10.0 {
        level.saturating_sub(1)
    } else {
        level
    }
}

/// Period adjustment: groundswell of 12 seconds or longer bumps a non-flat
/// level up by one. A missing period skips the adjustment.
#[must_use]
pub fn period_adjustment(level: u8, swell_period_s: Option<f64>) -> u8 {
    match swell_period_s {
        Some(period) if period >= 12.0 && level > 0 => (level + 1).min(6),
        _ => level,
    }
}

/// Rating for an ordinal level, clamped to [0, 6]
#[must_use]
pub fn rating_for_level(level: u8) -> Rating {
    let band = RATING_BANDS[usize::from(level.min(6))];
    Rating {
        level: band.level,
        label: band.label,
        color: band.color,
    }
}

/// Rate a set of condition inputs.
///
/// Wave height is required; the remaining inputs are optional and silently
/// skip their adjustment when absent. Adjustments apply wind-then-period,
/// each clamping independently.
#[must_use]
pub fn rate(
    wave_height_ft: f64,
    wind_knots: Option<f64>,
    wind_dir_deg: Option<f64>,
    swell_dir_deg: Option<f64>,
    swell_period_s: Option<f64>,
) -> Rating {
    let level = base_level(wave_height_ft);
    let level = wind_adjustment(level, wind_knots, wind_dir_deg, swell_dir_deg);
    let level = period_adjustment(level, swell_period_s);
    rating_for_level(level)
}
