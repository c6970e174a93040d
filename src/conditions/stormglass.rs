// ABOUTME: StormGlass condition provider: paid primary source with per-source hourly values
// ABOUTME: Fans each hour out into one Reading per upstream source for agreement scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! StormGlass provider (primary)

use super::{ConditionsError, ConditionsProvider, ForecastWindow, Reading};
use crate::constants::forecast::STORMGLASS_BASE;
use crate::http::{send_with_backoff, shared_client};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

/// Parameters requested from the weather-point endpoint
const POINT_PARAMS: &str = "waveHeight,swellHeight,swellPeriod,swellDirection,windSpeed,windDirection,airTemperature,waterTemperature";

/// Upstream sources requested for cross-source comparison
const POINT_SOURCES: &str = "sg,noaa,dwd,meteo";

/// StormGlass weather-point response. Each parameter maps upstream source
/// names to values, e.g. `"waveHeight": {"sg": 1.2, "noaa": 1.4}`.
#[derive(Debug, Deserialize)]
struct PointResponse {
    hours: Vec<PointHour>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointHour {
    time: DateTime<Utc>,
    #[serde(default)]
    wave_height: HashMap<String, f64>,
    #[serde(default)]
    swell_height: HashMap<String, f64>,
    #[serde(default)]
    swell_period: HashMap<String, f64>,
    #[serde(default)]
    swell_direction: HashMap<String, f64>,
    #[serde(default)]
    wind_speed: HashMap<String, f64>,
    #[serde(default)]
    wind_direction: HashMap<String, f64>,
    #[serde(default)]
    air_temperature: HashMap<String, f64>,
    #[serde(default)]
    water_temperature: HashMap<String, f64>,
}

impl PointHour {
    /// Every source that reported at least one parameter this hour
    fn sources(&self) -> BTreeSet<&str> {
        [
            &self.wave_height,
            &self.swell_height,
            &self.swell_period,
            &self.swell_direction,
            &self.wind_speed,
            &self.wind_direction,
            &self.air_temperature,
            &self.water_temperature,
        ]
        .into_iter()
        .flat_map(|m| m.keys().map(String::as_str))
        .collect()
    }

    fn reading_for(&self, source: &str) -> Reading {
        Reading {
            source: source.to_owned(),
            time: self.time,
            wave_height_m: self.wave_height.get(source).copied(),
            swell_height_m: self.swell_height.get(source).copied(),
            swell_period_s: self.swell_period.get(source).copied(),
            swell_dir_deg: self.swell_direction.get(source).copied(),
            wind_speed_ms: self.wind_speed.get(source).copied(),
            wind_dir_deg: self.wind_direction.get(source).copied(),
            air_temp_c: self.air_temperature.get(source).copied(),
            water_temp_c: self.water_temperature.get(source).copied(),
        }
    }
}

/// Paid primary condition source
pub struct StormGlassProvider {
    api_key: String,
}

impl StormGlassProvider {
    /// Create a provider with the given API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl ConditionsProvider for StormGlassProvider {
    fn name(&self) -> &'static str {
        "stormglass"
    }

    async fn fetch_conditions(
        &self,
        lat: f64,
        lng: f64,
        window: ForecastWindow,
    ) -> Result<Vec<Reading>, ConditionsError> {
        let url = format!("{STORMGLASS_BASE}/weather/point");
        let request = shared_client()
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[
                ("lat", lat.to_string()),
                ("lng", lng.to_string()),
                ("params", POINT_PARAMS.to_owned()),
                ("source", POINT_SOURCES.to_owned()),
                ("start", window.start.to_rfc3339()),
                ("end", window.end.to_rfc3339()),
            ]);

        let response = send_with_backoff(request)
            .await
            .map_err(|source| ConditionsError::Network { provider: "stormglass", source })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(ConditionsError::ProviderStatus { provider: "stormglass", status, body });
        }

        let point: PointResponse = response.json().await.map_err(|e| ConditionsError::Parse {
            provider: "stormglass",
            detail: e.to_string(),
        })?;

        // One reading per (hour, upstream source) so callers can score
        // cross-source agreement per valid time.
        let readings = point
            .hours
            .iter()
            .flat_map(|hour| {
                hour.sources()
                    .into_iter()
                    .map(|source| hour.reading_for(source))
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(readings)
    }
}
