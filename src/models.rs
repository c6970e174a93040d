// ABOUTME: Domain data structures shared across the integration core
// ABOUTME: Spots, external wearable activities, and persistence-ready session drafts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Core domain models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// A known surf spot. Immutable reference data loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    /// Stable spot identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

/// Load the static spot catalog from a JSON file.
///
/// # Errors
/// Returns an I/O error when the file is unreadable or a parse error when it
/// is not a JSON array of spots.
pub fn load_spots(path: &Path) -> Result<Vec<Spot>, SpotLoadError> {
    let raw = std::fs::read_to_string(path)?;
    let spots: Vec<Spot> = serde_json::from_str(&raw)?;
    info!(count = spots.len(), "loaded spot catalog");
    Ok(spots)
}

/// Failure to load the spot catalog
#[derive(Debug, thiserror::Error)]
pub enum SpotLoadError {
    /// File could not be read
    #[error("failed to read spot catalog: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid spot JSON
    #[error("failed to parse spot catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An activity record as reported by the wearable provider. Transient input;
/// only its derived [`SessionDraft`] is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalActivity {
    /// Provider-assigned activity identifier, the dedup key
    pub activity_id: i64,
    /// Epoch start time in seconds
    pub start_time_in_seconds: i64,
    /// Duration in seconds; zero or absent means unreported
    #[serde(default)]
    pub duration_in_seconds: Option<i64>,
    /// Provider activity-type tag (e.g. "SURFING")
    pub activity_type: String,
    /// User-visible activity label, if any
    #[serde(default)]
    pub activity_name: Option<String>,
    /// GPS latitude of the activity start
    #[serde(default)]
    pub start_latitude_in_degree: Option<f64>,
    /// GPS longitude of the activity start
    #[serde(default)]
    pub start_longitude_in_degree: Option<f64>,
}

/// A normalized, persistence-ready session derived from an external
/// activity after filtering, dedup, and geo-matching. Ownership transfers to
/// the persistence collaborator on emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    /// Owning user
    pub user_id: Uuid,
    /// Matched spot identifier
    pub spot_id: String,
    /// Matched spot display name
    pub spot_name: String,
    /// Session date (UTC)
    pub date: NaiveDate,
    /// Session start, "HH:MM" (UTC)
    pub start_time: String,
    /// Duration in whole minutes
    pub duration_minutes: u32,
    /// Waves caught; unknown for imported sessions
    pub wave_count: Option<u32>,
    /// Board used; unknown for imported sessions
    pub board: Option<String>,
    /// Free-form notes, defaulted from the activity label
    pub notes: String,
    /// User rating 0-6; unset for imported sessions
    pub rating: Option<u8>,
    /// Structured condition snapshot; unset for imported sessions
    pub conditions: Option<serde_json::Value>,
    /// External activity identifier this draft was imported from
    pub external_activity_id: String,
}
