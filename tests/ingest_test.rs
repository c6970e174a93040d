// ABOUTME: Tests for the activity ingestion pipeline across sync and webhook entry points
// ABOUTME: Validates filtering, dedup idempotency, geo-matching, and draft construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use breakline::ingest::webhook::{WebhookPayload, WebhookProcessor};
use breakline::ingest::{session_draft_from, ActivityIngestor, ImportOutcome};
use breakline::models::{load_spots, ExternalActivity, Spot, SpotLoadError};
use breakline::oauth::WearableCredential;
use breakline::storage::{memory::MemoryStore, Persistence};
use chrono::{Duration, Utc};
use common::{manager_with, spot, surf_activity, MockWearableApi};
use std::sync::Arc;
use uuid::Uuid;

fn test_spots() -> Arc<Vec<Spot>> {
    Arc::new(vec![
        spot("malibu", "Malibu", 34.0, -118.5),
        spot("mavericks", "Mavericks", 37.49, -122.5),
    ])
}

async fn connected_ingestor(
    api: Arc<MockWearableApi>,
    storage: Arc<MemoryStore>,
    user_id: Uuid,
) -> ActivityIngestor {
    storage
        .upsert_credential(
            user_id,
            WearableCredential {
                access_token: "token".into(),
                refresh_token: "refresh".into(),
                expires_at: Utc::now() + Duration::hours(1),
                external_account_id: Some("garmin-123".into()),
            },
        )
        .await
        .unwrap();

    let manager = manager_with(Arc::clone(&api), Arc::clone(&storage));
    ActivityIngestor::new(manager, api, storage, test_spots())
}

#[tokio::test]
async fn test_end_to_end_import_matches_nearby_spot() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    let ingestor = connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await;

    // ~5.5 km from Malibu, inside the 10 km matching radius.
    api.set_activities(vec![surf_activity(42, 34.05, -118.49)]).await;

    let report = ingestor.sync_recent(user_id).await.unwrap();
    assert_eq!(report.synced, 1);
    assert_eq!(report.skipped, 0);
    assert!(report.errors.is_empty());

    let sessions = storage.sessions().await;
    assert_eq!(sessions.len(), 1);
    let draft = &sessions[0];
    assert_eq!(draft.spot_id, "malibu");
    assert_eq!(draft.spot_name, "Malibu");
    assert_eq!(draft.duration_minutes, 60);
    assert_eq!(draft.external_activity_id, "42");
    assert_eq!(draft.user_id, user_id);
    assert_eq!(draft.notes, "Morning surf");
    assert!(draft.wave_count.is_none());
    assert!(draft.board.is_none());
    assert!(draft.rating.is_none());
}

#[tokio::test]
async fn test_resync_skips_already_imported_activity() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    let ingestor = connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await;

    api.set_activities(vec![surf_activity(42, 34.05, -118.49)]).await;

    let first = ingestor.sync_recent(user_id).await.unwrap();
    assert_eq!((first.synced, first.skipped), (1, 0));

    let second = ingestor.sync_recent(user_id).await.unwrap();
    assert_eq!((second.synced, second.skipped), (0, 1));
    assert_eq!(storage.session_count().await, 1);
}

#[tokio::test]
async fn test_non_surf_activity_is_dropped_without_diagnostics() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    let ingestor = connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await;

    let mut run = surf_activity(7, 34.05, -118.49);
    run.activity_type = "RUNNING".into();
    api.set_activities(vec![run]).await;

    let report = ingestor.sync_recent(user_id).await.unwrap();
    assert_eq!((report.synced, report.skipped), (0, 0));
    assert!(report.errors.is_empty());
    assert_eq!(storage.session_count().await, 0);
}

#[tokio::test]
async fn test_missing_gps_collects_diagnostic_and_continues() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    let ingestor = connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await;

    let mut indoor = surf_activity(8, 0.0, 0.0);
    indoor.start_latitude_in_degree = None;
    indoor.start_longitude_in_degree = None;
    api.set_activities(vec![indoor, surf_activity(9, 34.05, -118.49)]).await;

    let report = ingestor.sync_recent(user_id).await.unwrap();
    assert_eq!(report.synced, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("missing GPS"));
}

#[tokio::test]
async fn test_activity_far_from_every_spot_is_an_error_not_a_panic() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    let ingestor = connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await;

    // Hawaii, thousands of km from the catalog.
    api.set_activities(vec![surf_activity(10, 21.3, -157.8)]).await;

    let report = ingestor.sync_recent(user_id).await.unwrap();
    assert_eq!(report.synced, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("no known spot"));
    assert_eq!(storage.session_count().await, 0);
}

#[tokio::test]
async fn test_zero_duration_defaults_to_sixty_minutes() {
    let malibu = spot("malibu", "Malibu", 34.0, -118.5);
    let mut activity = surf_activity(11, 34.0, -118.5);
    activity.duration_in_seconds = None;
    let draft = session_draft_from(Uuid::new_v4(), &activity, &malibu);
    assert_eq!(draft.duration_minutes, 60);

    activity.duration_in_seconds = Some(0);
    let draft = session_draft_from(Uuid::new_v4(), &activity, &malibu);
    assert_eq!(draft.duration_minutes, 60);

    // 20 s rounds to zero minutes and also falls back.
    activity.duration_in_seconds = Some(20);
    let draft = session_draft_from(Uuid::new_v4(), &activity, &malibu);
    assert_eq!(draft.duration_minutes, 60);

    activity.duration_in_seconds = Some(5400);
    let draft = session_draft_from(Uuid::new_v4(), &activity, &malibu);
    assert_eq!(draft.duration_minutes, 90);
}

#[tokio::test]
async fn test_draft_derives_utc_date_and_start_time() {
    let malibu = spot("malibu", "Malibu", 34.0, -118.5);
    let mut activity = surf_activity(12, 34.0, -118.5);
    // 2026-02-06 14:30:00 UTC
    activity.start_time_in_seconds = 1_770_388_200;
    activity.activity_name = None;

    let draft = session_draft_from(Uuid::new_v4(), &activity, &malibu);
    assert_eq!(draft.date.to_string(), "2026-02-06");
    assert_eq!(draft.start_time, "14:30");
    assert_eq!(draft.notes, "Garmin sync");
}

#[tokio::test]
async fn test_webhook_then_sync_imports_exactly_once() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    storage.link_external_account("garmin-123", user_id).await;
    let ingestor = Arc::new(connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await);
    let processor = WebhookProcessor::new(
        Arc::clone(&ingestor),
        Arc::clone(&storage) as Arc<dyn Persistence>,
    );

    let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
        "activities": [{
            "userId": "garmin-123",
            "activityId": 42,
            "startTimeInSeconds": 1_772_300_000_i64,
            "durationInSeconds": 3600,
            "activityType": "SURFING",
            "activityName": "Dawn patrol",
            "startLatitudeInDegree": 34.05,
            "startLongitudeInDegree": -118.49
        }]
    }))
    .unwrap();
    processor.process_batch(payload).await;
    assert_eq!(storage.session_count().await, 1);

    // The same activity arriving through sync counts as skipped.
    api.set_activities(vec![surf_activity(42, 34.05, -118.49)]).await;
    let report = ingestor.sync_recent(user_id).await.unwrap();
    assert_eq!((report.synced, report.skipped), (0, 1));
    assert_eq!(storage.session_count().await, 1);
}

#[tokio::test]
async fn test_webhook_tolerates_unknown_users_and_bad_items() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    let ingestor = Arc::new(connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await);
    let processor = WebhookProcessor::new(ingestor, Arc::clone(&storage) as Arc<dyn Persistence>);

    // No account link registered: both items skip silently.
    let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
        "activities": [
            {
                "userId": "nobody",
                "activityId": 1,
                "startTimeInSeconds": 1_772_300_000_i64,
                "activityType": "SURFING"
            },
            {
                "activityId": 2,
                "startTimeInSeconds": 1_772_300_000_i64,
                "activityType": "SURFING"
            }
        ]
    }))
    .unwrap();
    processor.process_batch(payload).await;
    assert_eq!(storage.session_count().await, 0);
}

#[tokio::test]
async fn test_webhook_accept_is_fire_and_forget() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    storage.link_external_account("garmin-123", user_id).await;
    let ingestor = Arc::new(connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await);
    let processor = Arc::new(WebhookProcessor::new(
        ingestor,
        Arc::clone(&storage) as Arc<dyn Persistence>,
    ));

    // Malformed body: accepted and dropped without failing the caller.
    processor.accept(serde_json::json!({ "activities": "not-an-array" }));

    processor.accept(serde_json::json!({
        "activities": [{
            "userId": "garmin-123",
            "activityId": 55,
            "startTimeInSeconds": 1_772_300_000_i64,
            "durationInSeconds": 1800,
            "activityType": "SURFING",
            "startLatitudeInDegree": 34.05,
            "startLongitudeInDegree": -118.49
        }]
    }));

    // Processing happens after acknowledgment; poll briefly for the result.
    for _ in 0..50 {
        if storage.session_count().await == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(storage.session_count().await, 1);
}

#[tokio::test]
async fn test_import_activity_outcomes() {
    let api = Arc::new(MockWearableApi::new());
    let storage = Arc::new(MemoryStore::new());
    let user_id = Uuid::new_v4();
    let ingestor = connected_ingestor(Arc::clone(&api), Arc::clone(&storage), user_id).await;

    let paddle = ExternalActivity {
        activity_id: 77,
        start_time_in_seconds: 1_772_300_000,
        duration_in_seconds: Some(2700),
        activity_type: "STAND_UP_PADDLEBOARDING".into(),
        activity_name: None,
        start_latitude_in_degree: Some(34.0),
        start_longitude_in_degree: Some(-118.5),
    };
    assert_eq!(ingestor.import_activity(user_id, &paddle).await, ImportOutcome::FilteredOut);

    let surf = surf_activity(78, 34.0, -118.5);
    assert_eq!(ingestor.import_activity(user_id, &surf).await, ImportOutcome::Imported);
    assert_eq!(ingestor.import_activity(user_id, &surf).await, ImportOutcome::Skipped);
}

#[tokio::test]
async fn test_verification_ack_is_idempotent() {
    assert_eq!(WebhookProcessor::verification_ack(), WebhookProcessor::verification_ack());
}

#[test]
fn test_load_spots_from_catalog_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("spots.json");
    std::fs::write(
        &path,
        r#"[{"id":"malibu","name":"Malibu","lat":34.0,"lng":-118.5}]"#,
    )?;

    let spots = load_spots(&path)?;
    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].id, "malibu");
    assert!((spots[0].lat - 34.0).abs() < f64::EPSILON);
    Ok(())
}

#[test]
fn test_load_spots_reports_missing_file_and_bad_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = load_spots(&dir.path().join("nope.json"));
    assert!(matches!(missing, Err(SpotLoadError::Io(_))));

    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{not json")?;
    assert!(matches!(load_spots(&path), Err(SpotLoadError::Parse(_))));
    Ok(())
}
