// ABOUTME: Reqwest implementation of the wearable provider API
// ABOUTME: Token exchange, refresh, revocation, and activity listing against the Garmin endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! HTTP client for the wearable provider

use super::{OAuthError, TokenGrant, WearableApi};
use crate::config::WearableConfig;
use crate::constants::wearable;
use crate::http::{send_with_backoff, shared_client};
use crate::models::ExternalActivity;
use async_trait::async_trait;
use tracing::debug;

/// Production wearable API client. All calls go through the shared pooled
/// HTTP client and the crate-wide 429 backoff policy.
pub struct GarminApiClient {
    config: WearableConfig,
}

impl GarminApiClient {
    /// Create a client from loaded integration config
    #[must_use]
    pub fn new(config: WearableConfig) -> Self {
        Self { config }
    }

    async fn token_request(
        &self,
        params: &[(&str, &str)],
    ) -> Result<(u16, String), OAuthError> {
        let request = shared_client().post(wearable::TOKEN_URL).form(params);
        let response = send_with_backoff(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl WearableApi for GarminApiClient {
    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenGrant, OAuthError> {
        let (status, body) = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code_verifier", verifier),
            ])
            .await?;

        if !(200..300).contains(&status) {
            return Err(OAuthError::ExchangeFailed { status, body });
        }
        serde_json::from_str(&body)
            .map_err(|e| OAuthError::ExchangeFailed { status, body: format!("parse error: {e}") })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, OAuthError> {
        let (status, body) = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .await?;

        if !(200..300).contains(&status) {
            return Err(OAuthError::RefreshFailed { status, body });
        }
        serde_json::from_str(&body)
            .map_err(|e| OAuthError::RefreshFailed { status, body: format!("parse error: {e}") })
    }

    async fn revoke_token(&self, access_token: &str) -> Result<(), OAuthError> {
        let request = shared_client()
            .post(wearable::REVOKE_URL)
            .form(&[("token", access_token)]);
        let response = send_with_backoff(request).await?;
        if !response.status().is_success() {
            return Err(OAuthError::ApiFailed {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn fetch_activities(
        &self,
        access_token: &str,
        start_epoch_s: i64,
        end_epoch_s: i64,
    ) -> Result<Vec<ExternalActivity>, OAuthError> {
        let url = format!("{}/activities", wearable::API_BASE);
        let request = shared_client()
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("uploadStartTimeInSeconds", start_epoch_s.to_string()),
                ("uploadEndTimeInSeconds", end_epoch_s.to_string()),
            ]);
        let response = send_with_backoff(request).await?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(OAuthError::ApiFailed {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }
        let activities: Vec<ExternalActivity> = response.json().await?;
        debug!(count = activities.len(), "fetched wearable activities");
        Ok(activities)
    }
}
