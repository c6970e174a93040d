// ABOUTME: Condition provider gateway: ordered strategy chain over forecast data sources
// ABOUTME: Primary paid provider with transparent fallback, tagging results with the serving source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! # Condition data gateway
//!
//! Fetches environmental forecast/condition data for a coordinate from an
//! ordered list of provider strategies: the paid StormGlass provider when an
//! API key is configured, then the free Open-Meteo fallback. Each provider
//! is single-attempt (beyond the shared rate-limit backoff); any failure
//! falls through to the next strategy carrying the prior failure as context.

pub mod open_meteo;
pub mod stormglass;

use crate::config::ForecastConfig;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One provider's report of conditions at a point in time. Ephemeral;
/// consumed immediately by the rating engine and agreement scorer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reading {
    /// Upstream source tag (e.g. "sg", "noaa", "open-meteo")
    pub source: String,
    /// Valid time of the reading (UTC)
    pub time: DateTime<Utc>,
    /// Significant wave height in meters
    pub wave_height_m: Option<f64>,
    /// Primary swell height in meters
    pub swell_height_m: Option<f64>,
    /// Primary swell period in seconds
    pub swell_period_s: Option<f64>,
    /// Primary swell direction in degrees
    pub swell_dir_deg: Option<f64>,
    /// Wind speed in meters per second
    pub wind_speed_ms: Option<f64>,
    /// Wind direction in degrees
    pub wind_dir_deg: Option<f64>,
    /// Air temperature in Celsius
    pub air_temp_c: Option<f64>,
    /// Water temperature in Celsius
    pub water_temp_c: Option<f64>,
}

/// Time window for a conditions fetch
#[derive(Debug, Clone, Copy)]
pub struct ForecastWindow {
    /// Window start (UTC)
    pub start: DateTime<Utc>,
    /// Window end (UTC)
    pub end: DateTime<Utc>,
}

impl ForecastWindow {
    /// Window from now covering the next `hours` hours
    #[must_use]
    pub fn next_hours(hours: i64) -> Self {
        let start = Utc::now();
        Self { start, end: start + Duration::hours(hours) }
    }

    /// Window from now covering the next `days` days
    #[must_use]
    pub fn next_days(days: i64) -> Self {
        let start = Utc::now();
        Self { start, end: start + Duration::days(days) }
    }

    /// Whole days spanned by the window, rounded up, at least one
    #[must_use]
    pub fn days(&self) -> i64 {
        (((self.end - self.start).num_hours() + 23) / 24).max(1)
    }
}

/// Condition data failures
#[derive(Debug, thiserror::Error)]
pub enum ConditionsError {
    /// A provider answered with a non-success status
    #[error("{provider} returned {status}: {body}")]
    ProviderStatus {
        /// Provider name
        provider: &'static str,
        /// Upstream HTTP status
        status: u16,
        /// Upstream response body
        body: String,
    },
    /// Transport failure reaching a provider
    #[error("network error from {provider}: {source}")]
    Network {
        /// Provider name
        provider: &'static str,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },
    /// A provider response could not be decoded
    #[error("{provider} response could not be parsed: {detail}")]
    Parse {
        /// Provider name
        provider: &'static str,
        /// Parse failure detail
        detail: String,
    },
    /// Every strategy in the chain failed; carries the primary failure.
    /// Surfaced to users as degraded data, never silently replaced with
    /// stale or fabricated readings.
    #[error("all condition sources failed: {primary}")]
    AllSourcesFailed {
        /// Detail of the first (primary) provider's failure
        primary: String,
    },
}

/// One forecast/condition data source
#[async_trait]
pub trait ConditionsProvider: Send + Sync {
    /// Provider name used for source tagging and diagnostics
    fn name(&self) -> &'static str;

    /// Fetch readings for a coordinate over the given window
    async fn fetch_conditions(
        &self,
        lat: f64,
        lng: f64,
        window: ForecastWindow,
    ) -> Result<Vec<Reading>, ConditionsError>;
}

/// Conditions result tagged with the provider that served it
#[derive(Debug, Clone, Serialize)]
pub struct ConditionsReport {
    /// Name of the provider that produced the readings
    pub source: &'static str,
    /// The readings, one per upstream source per valid time
    pub readings: Vec<Reading>,
}

/// Ordered provider-strategy chain
pub struct ConditionsGateway {
    providers: Vec<Box<dyn ConditionsProvider>>,
}

impl ConditionsGateway {
    /// Build the standard chain from configuration: StormGlass first when an
    /// API key is present, Open-Meteo always last.
    #[must_use]
    pub fn from_config(config: &ForecastConfig) -> Self {
        let mut providers: Vec<Box<dyn ConditionsProvider>> = Vec::new();
        if let Some(key) = &config.stormglass_api_key {
            providers.push(Box::new(stormglass::StormGlassProvider::new(key.clone())));
        }
        providers.push(Box::new(open_meteo::OpenMeteoProvider::new()));
        Self { providers }
    }

    /// Build a chain over explicit strategies, ordered by priority
    #[must_use]
    pub fn with_providers(providers: Vec<Box<dyn ConditionsProvider>>) -> Self {
        Self { providers }
    }

    /// Fetch conditions, trying each strategy in order until one succeeds.
    ///
    /// # Errors
    /// [`ConditionsError::AllSourcesFailed`] carrying the primary provider's
    /// failure detail when no strategy returns data.
    pub async fn fetch_conditions(
        &self,
        lat: f64,
        lng: f64,
        window: ForecastWindow,
    ) -> Result<ConditionsReport, ConditionsError> {
        let mut primary_failure: Option<ConditionsError> = None;

        for provider in &self.providers {
            match provider.fetch_conditions(lat, lng, window).await {
                Ok(readings) => {
                    return Ok(ConditionsReport {
                        source: provider.name(),
                        readings,
                    });
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "condition source failed, trying next");
                    primary_failure.get_or_insert(e);
                }
            }
        }

        Err(ConditionsError::AllSourcesFailed {
            primary: primary_failure.map_or_else(|| "no providers configured".to_owned(), |e| e.to_string()),
        })
    }
}
