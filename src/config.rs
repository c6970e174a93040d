// ABOUTME: Environment-based configuration for the wearable and forecast integrations
// ABOUTME: Typed config structs with from_env constructors and presence checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Environment-based configuration management

use crate::constants::env_keys;
use crate::oauth::OAuthError;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

/// Wearable provider OAuth client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WearableConfig {
    /// OAuth client id issued by the provider
    pub client_id: String,
    /// OAuth client secret issued by the provider
    pub client_secret: String,
    /// Callback address registered with the provider
    pub redirect_uri: String,
}

impl WearableConfig {
    /// Load wearable credentials from the environment.
    ///
    /// # Errors
    /// Returns [`OAuthError::NotConfigured`] when either client credential is
    /// absent, which callers surface as "integration unavailable".
    pub fn from_env() -> Result<Self, OAuthError> {
        let client_id = env::var(env_keys::GARMIN_CLIENT_ID)
            .map_err(|_| OAuthError::NotConfigured(env_keys::GARMIN_CLIENT_ID))?;
        let client_secret = env::var(env_keys::GARMIN_CLIENT_SECRET)
            .map_err(|_| OAuthError::NotConfigured(env_keys::GARMIN_CLIENT_SECRET))?;
        let redirect_uri = env::var(env_keys::GARMIN_REDIRECT_URI)
            .unwrap_or_else(|_| "http://localhost:3001/api/auth/garmin/callback".into());

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
        })
    }

    /// Whether both client credentials are present in the environment
    #[must_use]
    pub fn is_configured() -> bool {
        env::var(env_keys::GARMIN_CLIENT_ID).is_ok()
            && env::var(env_keys::GARMIN_CLIENT_SECRET).is_ok()
    }
}

/// Condition provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// StormGlass API key; `None` disables the primary provider
    pub stormglass_api_key: Option<String>,
}

impl ForecastConfig {
    /// Load forecast provider configuration from the environment.
    ///
    /// A missing StormGlass key is not an error: the gateway runs
    /// fallback-only and a warning is logged at startup.
    #[must_use]
    pub fn from_env() -> Self {
        let stormglass_api_key = env::var(env_keys::STORMGLASS_API_KEY).ok();
        if stormglass_api_key.is_none() {
            warn!("STORMGLASS_API_KEY not set, condition data will use the free fallback only");
        }
        Self { stormglass_api_key }
    }
}
