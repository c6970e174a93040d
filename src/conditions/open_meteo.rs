// ABOUTME: Open-Meteo condition provider: free fallback combining marine and weather endpoints
// ABOUTME: Zips hourly marine swell data with wind/temperature into single-source readings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Open-Meteo provider (free fallback)

use super::{ConditionsError, ConditionsProvider, ForecastWindow, Reading};
use crate::constants::forecast::{OPEN_METEO_MARINE_BASE, OPEN_METEO_WEATHER_BASE};
use crate::http::{send_with_backoff, shared_client};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MarineResponse {
    hourly: MarineHourly,
}

#[derive(Debug, Default, Deserialize)]
struct MarineHourly {
    time: Vec<String>,
    #[serde(default)]
    wave_height: Vec<Option<f64>>,
    #[serde(default)]
    swell_wave_height: Vec<Option<f64>>,
    #[serde(default)]
    swell_wave_direction: Vec<Option<f64>>,
    #[serde(default)]
    swell_wave_period: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    hourly: WeatherHourly,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherHourly {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    wind_direction_10m: Vec<Option<f64>>,
}

/// Parse Open-Meteo's naive "2026-08-25T12:00" timestamps as UTC
fn parse_hour(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Free fallback condition source
#[derive(Default)]
pub struct OpenMeteoProvider;

impl OpenMeteoProvider {
    /// Create the provider
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ConditionsError> {
        let request = shared_client().get(url).query(query);
        let response = send_with_backoff(request)
            .await
            .map_err(|source| ConditionsError::Network { provider: "open-meteo", source })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(ConditionsError::ProviderStatus { provider: "open-meteo", status, body });
        }

        response.json().await.map_err(|e| ConditionsError::Parse {
            provider: "open-meteo",
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl ConditionsProvider for OpenMeteoProvider {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    async fn fetch_conditions(
        &self,
        lat: f64,
        lng: f64,
        window: ForecastWindow,
    ) -> Result<Vec<Reading>, ConditionsError> {
        let days = window.days().to_string();

        let marine: MarineResponse = self
            .get_json(
                OPEN_METEO_MARINE_BASE,
                &[
                    ("latitude", lat.to_string()),
                    ("longitude", lng.to_string()),
                    (
                        "hourly",
                        "wave_height,swell_wave_height,swell_wave_direction,swell_wave_period"
                            .to_owned(),
                    ),
                    ("forecast_days", days.clone()),
                ],
            )
            .await?;

        let weather: WeatherResponse = self
            .get_json(
                OPEN_METEO_WEATHER_BASE,
                &[
                    ("latitude", lat.to_string()),
                    ("longitude", lng.to_string()),
                    (
                        "hourly",
                        "temperature_2m,wind_speed_10m,wind_direction_10m".to_owned(),
                    ),
                    ("wind_speed_unit", "ms".to_owned()),
                    ("forecast_days", days),
                ],
            )
            .await?;

        let mh = marine.hourly;
        let wh = weather.hourly;

        let readings = mh
            .time
            .iter()
            .enumerate()
            .filter_map(|(i, raw_time)| {
                let time = parse_hour(raw_time)?;
                // The weather series may differ in length; align by timestamp
                // position, which both endpoints emit on the same hour grid.
                let weather_idx = wh.time.iter().position(|t| t == raw_time).unwrap_or(i);
                Some(Reading {
                    source: "open-meteo".to_owned(),
                    time,
                    wave_height_m: value_at(&mh.wave_height, i),
                    swell_height_m: value_at(&mh.swell_wave_height, i),
                    swell_period_s: value_at(&mh.swell_wave_period, i),
                    swell_dir_deg: value_at(&mh.swell_wave_direction, i),
                    wind_speed_ms: value_at(&wh.wind_speed_10m, weather_idx),
                    wind_dir_deg: value_at(&wh.wind_direction_10m, weather_idx),
                    air_temp_c: value_at(&wh.temperature_2m, weather_idx),
                    water_temp_c: None,
                })
            })
            .collect();

        Ok(readings)
    }
}

fn value_at(series: &[Option<f64>], idx: usize) -> Option<f64> {
    series.get(idx).copied().flatten()
}
