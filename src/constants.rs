// ABOUTME: Centralized constants for provider endpoints, limits, and timing policy
// ABOUTME: Single source of truth for tunable values used across the integration core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Crate-wide constants

/// Wearable provider endpoints and defaults
pub mod wearable {
    /// Authorization confirmation page shown to the user
    pub const AUTH_URL: &str = "https://connect.garmin.com/oauthConfirm";
    /// Token endpoint for authorization-code and refresh-token grants
    pub const TOKEN_URL: &str = "https://connectapi.garmin.com/oauth-service/oauth/token";
    /// Best-effort token revocation endpoint
    pub const REVOKE_URL: &str = "https://connectapi.garmin.com/oauth-service/oauth/revoke";
    /// Wellness API base for activity listings
    pub const API_BASE: &str = "https://apis.garmin.com/wellness-api/rest";
    /// OAuth scope requested for activity ingestion
    pub const SCOPE: &str = "activity:read";
    /// Token lifetime assumed when the provider omits `expires_in` (90 days)
    pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 7_776_000;
    /// Activity-type tag for the tracked sport
    pub const SURF_ACTIVITY_TYPE: &str = "SURFING";
}

/// Condition provider endpoints
pub mod forecast {
    /// StormGlass API base (primary, paid)
    pub const STORMGLASS_BASE: &str = "https://api.stormglass.io/v2";
    /// Open-Meteo marine API base (free fallback)
    pub const OPEN_METEO_MARINE_BASE: &str = "https://marine-api.open-meteo.com/v1/marine";
    /// Open-Meteo weather API base (free fallback)
    pub const OPEN_METEO_WEATHER_BASE: &str = "https://api.open-meteo.com/v1/forecast";
}

/// Timing and retry policy
pub mod policy {
    use std::time::Duration;

    /// Pending authorization time-to-live
    pub const PENDING_AUTH_TTL: Duration = Duration::from_secs(10 * 60);
    /// Interval between sweeps of expired pending authorizations
    pub const PENDING_AUTH_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
    /// Maximum rate-limit retries before the final unconditional attempt
    pub const RATE_LIMIT_RETRIES: u32 = 3;
    /// Base delay for rate-limit backoff (doubles per attempt: 1s, 2s, 4s)
    pub const RATE_LIMIT_BASE_DELAY: Duration = Duration::from_secs(1);
    /// Trailing window covered by a pull-based sync
    pub const SYNC_WINDOW_DAYS: i64 = 30;
    /// Maximum distance between an activity start and a matched spot
    pub const SPOT_MATCH_RADIUS_KM: f64 = 10.0;
    /// Session duration assumed when the activity reports none
    pub const DEFAULT_SESSION_MINUTES: u32 = 60;
}

/// Environment variable names for integration configuration
pub mod env_keys {
    /// Wearable OAuth client id
    pub const GARMIN_CLIENT_ID: &str = "GARMIN_CLIENT_ID";
    /// Wearable OAuth client secret
    pub const GARMIN_CLIENT_SECRET: &str = "GARMIN_CLIENT_SECRET";
    /// Callback address registered with the wearable provider
    pub const GARMIN_REDIRECT_URI: &str = "GARMIN_REDIRECT_URI";
    /// StormGlass API key; absent means fallback-only condition data
    pub const STORMGLASS_API_KEY: &str = "STORMGLASS_API_KEY";
    /// Log level override (error, warn, info, debug, trace)
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Log output format (json, pretty, compact)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
}
