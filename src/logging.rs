// ABOUTME: Logging configuration and tracing-subscriber setup for the integration core
// ABOUTME: Selects level and output format from the environment at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Structured logging setup

use crate::constants::env_keys;
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact single-line format
    Compact,
}

impl LogFormat {
    fn from_env() -> Self {
        match env::var(env_keys::LOG_FORMAT).as_deref() {
            Ok("json") => Self::Json,
            Ok("pretty") => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Level comes from `LOG_LEVEL` (falling back to `RUST_LOG`, then `info`),
/// format from `LOG_FORMAT`. Calling this twice returns an error from the
/// registry; callers treat that as already-initialized.
///
/// # Errors
/// Returns an error when a global subscriber is already installed.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = env::var(env_keys::LOG_LEVEL)
        .map_or_else(|_| EnvFilter::try_from_default_env(), |level| Ok(EnvFilter::new(level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_env() {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    }
}
