// ABOUTME: Shared HTTP client with connection pooling and rate-limit backoff for outbound calls
// ABOUTME: Singleton reqwest client plus the bounded 429 retry policy used by all integrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Outbound HTTP plumbing shared by the wearable and condition integrations

use crate::constants::policy::{RATE_LIMIT_BASE_DELAY, RATE_LIMIT_RETRIES};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Global shared HTTP client with pooled connections
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get the shared HTTP client for outbound provider calls.
///
/// The client uses connection pooling with a 30s request timeout and 10s
/// connect timeout. A timed-out call surfaces as a request error and is
/// treated like any other provider failure.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        ClientBuilder::new()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Send a request, retrying on HTTP 429 with exponential backoff.
///
/// Up to three retries are made with 1s, 2s, and 4s delays; after that one
/// final unconditional attempt is issued and its response returned as-is.
/// Any non-429 response (success or failure) is returned to the caller
/// without retry; transport errors propagate immediately.
///
/// # Errors
/// Returns the underlying [`reqwest::Error`] on connection or timeout
/// failure.
pub async fn send_with_backoff(request: RequestBuilder) -> Result<Response, reqwest::Error> {
    for attempt in 0..RATE_LIMIT_RETRIES {
        // Streaming bodies cannot be cloned; fall through to the single attempt.
        let Some(req) = request.try_clone() else {
            break;
        };
        let response = req.send().await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let delay = RATE_LIMIT_BASE_DELAY * 2u32.pow(attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "rate limited, backing off");
            tokio::time::sleep(delay).await;
            continue;
        }
        return Ok(response);
    }
    request.send().await
}
