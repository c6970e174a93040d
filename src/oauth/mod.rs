// ABOUTME: OAuth module for the wearable integration: PKCE, pending authorizations, token shapes
// ABOUTME: Defines the provider API seam and the error taxonomy for the token lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! # Wearable OAuth
//!
//! OAuth2 authorization-code flow with PKCE for the connected wearable
//! account. The manager in [`manager`] drives the flow; the HTTP client in
//! [`client`] talks to the provider endpoints. Outbound calls and the
//! pending-authorization store sit behind traits so tests can substitute
//! them.

pub mod client;
pub mod manager;

use crate::constants::policy::PENDING_AUTH_TTL;
use crate::models::ExternalActivity;
use crate::storage::StorageError;
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// OAuth and wearable-API error taxonomy
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Integration credentials are absent; the feature is unavailable
    #[error("wearable integration not configured: {0} is not set")]
    NotConfigured(&'static str),

    /// The state value is unknown, already consumed, or expired; the user
    /// must restart the connect flow
    #[error("invalid or expired authorization state")]
    InvalidState,

    /// The provider rejected the authorization-code exchange
    #[error("token exchange failed ({status}): {body}")]
    ExchangeFailed {
        /// Upstream HTTP status
        status: u16,
        /// Upstream response body
        body: String,
    },

    /// The provider rejected the refresh-token exchange
    #[error("token refresh failed ({status}): {body}")]
    RefreshFailed {
        /// Upstream HTTP status
        status: u16,
        /// Upstream response body
        body: String,
    },

    /// A bearer-authenticated API call failed
    #[error("wearable API call failed ({status}): {body}")]
    ApiFailed {
        /// Upstream HTTP status
        status: u16,
        /// Upstream response body
        body: String,
    },

    /// No wearable account is connected for this user
    #[error("no wearable account connected")]
    NotConnected,

    /// Transport-level failure reaching the provider
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Persistence collaborator failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Stored wearable credential for one user.
///
/// An access token past `expires_at` is never sent to the provider; callers
/// go through [`manager::WearableAuthManager::ensure_fresh_token`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WearableCredential {
    /// Bearer access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// Absolute access-token expiry (UTC)
    pub expires_at: DateTime<Utc>,
    /// Provider account identifier, when the provider reports one
    pub external_account_id: Option<String>,
}

impl WearableCredential {
    /// Whether the access token has reached its expiry
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Token grant returned by the provider's token endpoint, for both
/// authorization-code and refresh-token exchanges
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// New bearer access token
    pub access_token: String,
    /// New refresh token; refresh responses may omit it
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds; defaulted when absent
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Provider account identifier
    #[serde(default, rename = "user_id")]
    pub external_account_id: Option<String>,
}

/// PKCE verifier/challenge pair (S256)
#[derive(Debug, Clone)]
pub struct PkcePair {
    /// Random verifier, base64url without padding
    pub verifier: String,
    /// SHA-256 challenge of the verifier, base64url without padding
    pub challenge: String,
}

impl PkcePair {
    /// Generate a fresh verifier and its S256 challenge
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let verifier = URL_SAFE_NO_PAD.encode(bytes);
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self { verifier, challenge }
    }
}

/// Generate a random opaque state value for CSRF binding
#[must_use]
pub fn generate_state() -> String {
    let mut bytes = [0_u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// An authorization flow awaiting its callback. Keyed by state, single-use,
/// garbage-collected after [`PENDING_AUTH_TTL`].
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    /// PKCE verifier to present at the token exchange
    pub verifier: String,
    /// User who started the flow
    pub user_id: Uuid,
    /// Flow start time
    pub created_at: DateTime<Utc>,
}

impl PendingAuthorization {
    /// Whether this entry has outlived its time-to-live
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).to_std().is_ok_and(|age| age >= PENDING_AUTH_TTL)
    }
}

/// Store for in-flight authorization flows.
///
/// `take` has delete-if-present semantics so a completion racing the sweeper
/// resolves to whichever side removed the entry first.
#[async_trait]
pub trait PendingAuthStore: Send + Sync {
    /// Store a pending authorization under its state value
    async fn put(&self, state: String, pending: PendingAuthorization);

    /// Remove and return the entry for `state`, if present
    async fn take(&self, state: &str) -> Option<PendingAuthorization>;

    /// Drop expired entries, returning how many were removed
    async fn purge_expired(&self) -> usize;
}

/// In-memory pending-authorization store
#[derive(Default)]
pub struct InMemoryPendingStore {
    entries: RwLock<HashMap<String, PendingAuthorization>>,
}

impl InMemoryPendingStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl PendingAuthStore for InMemoryPendingStore {
    async fn put(&self, state: String, pending: PendingAuthorization) {
        self.entries.write().await.insert(state, pending);
    }

    async fn take(&self, state: &str) -> Option<PendingAuthorization> {
        self.entries.write().await.remove(state)
    }

    async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, pending| !pending.is_expired(now));
        before - entries.len()
    }
}

/// Outbound calls to the wearable provider.
///
/// The production implementation is [`client::GarminApiClient`]; tests
/// substitute mocks to observe call counts and inject failures.
#[async_trait]
pub trait WearableApi: Send + Sync {
    /// Exchange an authorization code (with its PKCE verifier) for tokens
    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenGrant, OAuthError>;

    /// Exchange a refresh token for a new grant
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, OAuthError>;

    /// Best-effort token revocation at the provider
    async fn revoke_token(&self, access_token: &str) -> Result<(), OAuthError>;

    /// List activities uploaded inside the given epoch-second window
    async fn fetch_activities(
        &self,
        access_token: &str,
        start_epoch_s: i64,
        end_epoch_s: i64,
    ) -> Result<Vec<ExternalActivity>, OAuthError>;
}
