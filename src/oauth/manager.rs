// ABOUTME: Wearable auth manager driving the PKCE flow and token lifecycle
// ABOUTME: Begin/complete authorization, serialized refresh, best-effort revocation, pending sweeper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! # Wearable Auth Manager
//!
//! Owns the authorization-code flow from the initial redirect through token
//! refresh and disconnect. Pending authorizations are single-use and swept
//! on a fixed interval by an explicitly started background task.

use super::{
    generate_state, OAuthError, PendingAuthStore, PendingAuthorization, PkcePair, WearableApi,
    WearableCredential,
};
use crate::config::WearableConfig;
use crate::constants::policy::PENDING_AUTH_SWEEP_INTERVAL;
use crate::constants::wearable;
use crate::storage::Persistence;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Central manager for the wearable OAuth lifecycle
pub struct WearableAuthManager {
    config: WearableConfig,
    api: Arc<dyn WearableApi>,
    storage: Arc<dyn Persistence>,
    pending: Arc<dyn PendingAuthStore>,
    refresh_locks: RwLock<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl WearableAuthManager {
    /// Create a manager over the given collaborators
    pub fn new(
        config: WearableConfig,
        api: Arc<dyn WearableApi>,
        storage: Arc<dyn Persistence>,
        pending: Arc<dyn PendingAuthStore>,
    ) -> Self {
        Self {
            config,
            api,
            storage,
            pending,
            refresh_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Start an authorization flow for a user.
    ///
    /// Generates a PKCE pair and an opaque state, stores the pending
    /// authorization under the state, and returns the provider URL to send
    /// the user to along with the state value.
    ///
    /// # Errors
    /// Propagates [`OAuthError::NotConfigured`] from config loading paths;
    /// this method itself only fails if the pending store does.
    pub async fn begin_authorization(&self, user_id: Uuid) -> Result<(String, String), OAuthError> {
        let pkce = PkcePair::generate();
        let state = generate_state();

        self.pending
            .put(
                state.clone(),
                PendingAuthorization {
                    verifier: pkce.verifier,
                    user_id,
                    created_at: Utc::now(),
                },
            )
            .await;

        let authorization_url = format!(
            "{}?client_id={}&response_type=code&scope={}&redirect_uri={}&state={}&code_challenge={}&code_challenge_method=S256",
            wearable::AUTH_URL,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(wearable::SCOPE),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&state),
            urlencoding::encode(&pkce.challenge),
        );

        debug!(%user_id, "started wearable authorization flow");
        Ok((authorization_url, state))
    }

    /// Complete an authorization flow from the provider callback.
    ///
    /// Consumes the pending authorization for `state` (single-use: a replayed
    /// or expired state fails), exchanges the code for tokens, and persists
    /// the credential for the originating user.
    ///
    /// # Errors
    /// [`OAuthError::InvalidState`] for unknown, consumed, or expired state;
    /// [`OAuthError::ExchangeFailed`] when the provider rejects the code.
    pub async fn complete_authorization(
        &self,
        code: &str,
        state: &str,
    ) -> Result<WearableCredential, OAuthError> {
        let pending = self
            .pending
            .take(state)
            .await
            .ok_or(OAuthError::InvalidState)?;

        if pending.is_expired(Utc::now()) {
            return Err(OAuthError::InvalidState);
        }

        let grant = self.api.exchange_code(code, &pending.verifier).await?;

        let lifetime = grant
            .expires_in
            .unwrap_or(wearable::DEFAULT_TOKEN_LIFETIME_SECS);
        let refresh_token = grant.refresh_token.unwrap_or_default();
        let credential = WearableCredential {
            access_token: grant.access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(lifetime),
            external_account_id: grant.external_account_id,
        };

        self.storage
            .upsert_credential(pending.user_id, credential.clone())
            .await?;

        info!(user_id = %pending.user_id, "wearable account connected");
        Ok(credential)
    }

    /// Return a non-expired access token for the user, refreshing first when
    /// the stored token has passed its expiry.
    ///
    /// Refresh is serialized per user, so concurrent callers trigger at most
    /// one refresh exchange and none observe a stale refresh token.
    ///
    /// # Errors
    /// [`OAuthError::NotConnected`] when no credential is stored;
    /// [`OAuthError::RefreshFailed`] when the provider rejects the refresh,
    /// surfaced without automatic retry.
    pub async fn ensure_fresh_token(&self, user_id: Uuid) -> Result<String, OAuthError> {
        let lock = self.refresh_lock_for(user_id).await;
        let _guard = lock.lock().await;

        let credential = self
            .storage
            .get_credential(user_id)
            .await?
            .ok_or(OAuthError::NotConnected)?;

        if !credential.is_expired(Utc::now()) {
            return Ok(credential.access_token);
        }

        info!(%user_id, "access token expired, refreshing");
        let grant = self.api.refresh_token(&credential.refresh_token).await?;

        let lifetime = grant
            .expires_in
            .unwrap_or(wearable::DEFAULT_TOKEN_LIFETIME_SECS);
        let refreshed = WearableCredential {
            access_token: grant.access_token.clone(),
            refresh_token: grant.refresh_token.unwrap_or(credential.refresh_token),
            expires_at: Utc::now() + Duration::seconds(lifetime),
            external_account_id: grant
                .external_account_id
                .or(credential.external_account_id),
        };

        self.storage.upsert_credential(user_id, refreshed).await?;
        Ok(grant.access_token)
    }

    /// Disconnect the user's wearable account.
    ///
    /// Provider-side revocation is advisory: a failure is logged and the
    /// local credential is deleted regardless.
    ///
    /// # Errors
    /// Only storage failures propagate; revocation failures never do.
    pub async fn disconnect(&self, user_id: Uuid) -> Result<(), OAuthError> {
        if let Some(credential) = self.storage.get_credential(user_id).await? {
            if let Err(e) = self.api.revoke_token(&credential.access_token).await {
                warn!(%user_id, error = %e, "token revocation failed, deleting local credential anyway");
            }
        }
        self.storage.delete_credential(user_id).await?;
        info!(%user_id, "wearable account disconnected");
        Ok(())
    }

    async fn refresh_lock_for(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        if let Some(lock) = self.refresh_locks.read().await.get(&user_id) {
            return Arc::clone(lock);
        }
        let mut locks = self.refresh_locks.write().await;
        Arc::clone(locks.entry(user_id).or_default())
    }
}

/// Handle to the pending-authorization sweeper task
pub struct PendingSweeper {
    task: JoinHandle<()>,
}

impl PendingSweeper {
    /// Stop the sweeper
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for PendingSweeper {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start the periodic sweep of expired pending authorizations.
///
/// The sweep runs every [`PENDING_AUTH_SWEEP_INTERVAL`] until the returned
/// handle is stopped. It is safe to run concurrently with authorization
/// completion: both sides remove entries with delete-if-present semantics.
#[must_use]
pub fn start_pending_sweeper(store: Arc<dyn PendingAuthStore>) -> PendingSweeper {
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PENDING_AUTH_SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                debug!(purged, "swept expired pending authorizations");
            }
        }
    });
    PendingSweeper { task }
}
