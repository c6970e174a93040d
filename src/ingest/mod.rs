// ABOUTME: Activity ingestion pipeline: filter, dedup, geo-match, and emit session drafts
// ABOUTME: Shared core behind the pull-based sync and the push-based webhook entry points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! # Activity ingestion
//!
//! Converts wearable activity records into domain session drafts. Each
//! activity is filtered to the tracked sport, checked against previously
//! imported external ids, geo-matched to the nearest known spot, and emitted
//! for persistence. Per-activity failures are collected as diagnostics and
//! never abort the batch.

pub mod webhook;

use crate::constants::policy::{DEFAULT_SESSION_MINUTES, SPOT_MATCH_RADIUS_KM, SYNC_WINDOW_DAYS};
use crate::constants::wearable::SURF_ACTIVITY_TYPE;
use crate::geo::find_nearest_spot;
use crate::models::{ExternalActivity, SessionDraft, Spot};
use crate::oauth::manager::WearableAuthManager;
use crate::oauth::{OAuthError, WearableApi};
use crate::storage::{Persistence, StorageError};
use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Outcome of importing a single activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A session draft was created
    Imported,
    /// Not the tracked sport; dropped without counting
    FilteredOut,
    /// Already imported (or lost a dedup race); counted as skipped
    Skipped,
    /// Could not be imported; diagnostic kept, batch continues
    Failed(String),
}

/// Result of a pull-based sync
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Drafts created
    pub synced: u32,
    /// Activities already imported
    pub skipped: u32,
    /// Per-activity diagnostics for failures
    pub errors: Vec<String>,
}

/// Converts external activities into session drafts
pub struct ActivityIngestor {
    auth: Arc<WearableAuthManager>,
    api: Arc<dyn WearableApi>,
    storage: Arc<dyn Persistence>,
    spots: Arc<Vec<Spot>>,
}

impl ActivityIngestor {
    /// Create an ingestor over the given collaborators and spot catalog
    pub fn new(
        auth: Arc<WearableAuthManager>,
        api: Arc<dyn WearableApi>,
        storage: Arc<dyn Persistence>,
        spots: Arc<Vec<Spot>>,
    ) -> Self {
        Self {
            auth,
            api,
            storage,
            spots,
        }
    }

    /// Pull and import the user's activities from the trailing 30 days.
    ///
    /// # Errors
    /// Fails only when the token cannot be refreshed or the activity listing
    /// call fails outright; per-activity problems land in
    /// [`SyncReport::errors`] instead.
    pub async fn sync_recent(&self, user_id: Uuid) -> Result<SyncReport, OAuthError> {
        let token = self.auth.ensure_fresh_token(user_id).await?;

        let end = Utc::now().timestamp();
        let start = end - SYNC_WINDOW_DAYS * 86_400;
        let activities = self.api.fetch_activities(&token, start, end).await?;

        let mut report = SyncReport::default();
        for activity in &activities {
            match self.import_activity(user_id, activity).await {
                ImportOutcome::Imported => report.synced += 1,
                ImportOutcome::Skipped => report.skipped += 1,
                ImportOutcome::FilteredOut => {}
                ImportOutcome::Failed(diagnostic) => report.errors.push(diagnostic),
            }
        }

        info!(
            %user_id,
            synced = report.synced,
            skipped = report.skipped,
            errors = report.errors.len(),
            "wearable sync finished"
        );
        Ok(report)
    }

    /// Run one activity through the import pipeline.
    ///
    /// Idempotent: an external id that already has a draft, or that loses a
    /// concurrent-insert race on the unique constraint, comes back
    /// [`ImportOutcome::Skipped`].
    pub async fn import_activity(
        &self,
        user_id: Uuid,
        activity: &ExternalActivity,
    ) -> ImportOutcome {
        if activity.activity_type != SURF_ACTIVITY_TYPE {
            return ImportOutcome::FilteredOut;
        }

        let external_id = activity.activity_id.to_string();
        match self
            .storage
            .find_session_by_external_activity_id(&external_id)
            .await
        {
            Ok(Some(_)) => {
                debug!(activity_id = %external_id, "activity already imported");
                return ImportOutcome::Skipped;
            }
            Ok(None) => {}
            Err(e) => return ImportOutcome::Failed(format!("activity {external_id}: {e}")),
        }

        let (Some(lat), Some(lng)) = (
            activity.start_latitude_in_degree,
            activity.start_longitude_in_degree,
        ) else {
            return ImportOutcome::Failed(format!(
                "activity {external_id}: missing GPS coordinates"
            ));
        };

        let Some(spot) = find_nearest_spot(lat, lng, &self.spots, SPOT_MATCH_RADIUS_KM) else {
            return ImportOutcome::Failed(format!(
                "activity {external_id}: no known spot within {SPOT_MATCH_RADIUS_KM} km"
            ));
        };

        let draft = session_draft_from(user_id, activity, spot);
        match self.storage.create_session_draft(draft).await {
            Ok(_) => ImportOutcome::Imported,
            Err(StorageError::Conflict(_)) => ImportOutcome::Skipped,
            Err(e) => ImportOutcome::Failed(format!("activity {external_id}: {e}")),
        }
    }
}

/// Build a session draft from a matched activity.
///
/// Date and start time are UTC, derived from the epoch start. Duration is
/// seconds rounded to minutes, defaulting to 60 when zero or unreported.
/// Wave count, board, rating, and conditions stay unset for imports.
#[must_use]
pub fn session_draft_from(user_id: Uuid, activity: &ExternalActivity, spot: &Spot) -> SessionDraft {
    let start = DateTime::from_timestamp(activity.start_time_in_seconds, 0)
        .unwrap_or(DateTime::UNIX_EPOCH);

    let minutes = activity
        .duration_in_seconds
        .map_or(0, |s| ((s as f64) / 60.0).round() as u32);
    let duration_minutes = if minutes == 0 {
        DEFAULT_SESSION_MINUTES
    } else {
        minutes
    };

    SessionDraft {
        user_id,
        spot_id: spot.id.clone(),
        spot_name: spot.name.clone(),
        date: start.date_naive(),
        start_time: format!("{:02}:{:02}", start.hour(), start.minute()),
        duration_minutes,
        wave_count: None,
        board: None,
        notes: activity
            .activity_name
            .clone()
            .unwrap_or_else(|| "Garmin sync".to_owned()),
        rating: None,
        conditions: None,
        external_activity_id: activity.activity_id.to_string(),
    }
}
