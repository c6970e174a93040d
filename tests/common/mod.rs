// ABOUTME: Shared fixtures for integration tests: mock wearable API and domain builders
// ABOUTME: Call-counting mocks let tests assert exactly how many provider calls were made
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

use async_trait::async_trait;
use breakline::config::WearableConfig;
use breakline::models::{ExternalActivity, Spot};
use breakline::oauth::manager::WearableAuthManager;
use breakline::oauth::{InMemoryPendingStore, OAuthError, TokenGrant, WearableApi};
use breakline::storage::memory::MemoryStore;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock wearable API that counts calls and serves configurable responses
#[derive(Default)]
pub struct MockWearableApi {
    pub exchange_calls: AtomicU32,
    pub refresh_calls: AtomicU32,
    pub revoke_calls: AtomicU32,
    pub fetch_calls: AtomicU32,
    pub fail_exchange: bool,
    pub fail_refresh: bool,
    pub fail_revoke: bool,
    pub external_account_id: Option<String>,
    pub activities: RwLock<Vec<ExternalActivity>>,
}

impl MockWearableApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_activities(&self, activities: Vec<ExternalActivity>) {
        *self.activities.write().await = activities;
    }

    fn grant(&self, suffix: &str) -> TokenGrant {
        TokenGrant {
            access_token: format!("access-{suffix}"),
            refresh_token: Some(format!("refresh-{suffix}")),
            expires_in: Some(3600),
            external_account_id: self.external_account_id.clone(),
        }
    }
}

#[async_trait]
impl WearableApi for MockWearableApi {
    async fn exchange_code(&self, code: &str, _verifier: &str) -> Result<TokenGrant, OAuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_exchange {
            return Err(OAuthError::ExchangeFailed {
                status: 400,
                body: "invalid_grant".into(),
            });
        }
        Ok(self.grant(code))
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<TokenGrant, OAuthError> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh {
            return Err(OAuthError::RefreshFailed {
                status: 401,
                body: "expired refresh token".into(),
            });
        }
        Ok(self.grant(&format!("r{n}")))
    }

    async fn revoke_token(&self, _access_token: &str) -> Result<(), OAuthError> {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_revoke {
            return Err(OAuthError::ApiFailed {
                status: 500,
                body: "revocation endpoint down".into(),
            });
        }
        Ok(())
    }

    async fn fetch_activities(
        &self,
        _access_token: &str,
        _start_epoch_s: i64,
        _end_epoch_s: i64,
    ) -> Result<Vec<ExternalActivity>, OAuthError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.activities.read().await.clone())
    }
}

pub fn test_config() -> WearableConfig {
    WearableConfig {
        client_id: "test-client".into(),
        client_secret: "test-secret".into(),
        redirect_uri: "http://localhost:3001/api/auth/garmin/callback".into(),
    }
}

pub fn manager_with(
    api: Arc<MockWearableApi>,
    storage: Arc<MemoryStore>,
) -> Arc<WearableAuthManager> {
    manager_with_pending(api, storage, Arc::new(InMemoryPendingStore::new()))
}

pub fn manager_with_pending(
    api: Arc<MockWearableApi>,
    storage: Arc<MemoryStore>,
    pending: Arc<InMemoryPendingStore>,
) -> Arc<WearableAuthManager> {
    Arc::new(WearableAuthManager::new(test_config(), api, storage, pending))
}

pub fn spot(id: &str, name: &str, lat: f64, lng: f64) -> Spot {
    Spot {
        id: id.into(),
        name: name.into(),
        lat,
        lng,
    }
}

pub fn surf_activity(activity_id: i64, lat: f64, lng: f64) -> ExternalActivity {
    ExternalActivity {
        activity_id,
        start_time_in_seconds: 1_772_300_000,
        duration_in_seconds: Some(3600),
        activity_type: "SURFING".into(),
        activity_name: Some("Morning surf".into()),
        start_latitude_in_degree: Some(lat),
        start_longitude_in_degree: Some(lng),
    }
}
