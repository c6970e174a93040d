// ABOUTME: Push-based webhook processing for provider-initiated activity batches
// ABOUTME: Ack-first handling that tolerates unknown users and malformed payloads silently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! # Webhook ingestion
//!
//! The provider pushes activity batches as users sync their wearables. The
//! receipt must be acknowledged before any processing happens, and nothing
//! in the batch is ever allowed to fail the connection: malformed payloads
//! and unknown users are skipped silently, import failures are logged and
//! dropped. A retry storm from surfaced errors would be worse than a lost
//! record the next pull-based sync picks up anyway.

use super::{ActivityIngestor, ImportOutcome};
use crate::models::ExternalActivity;
use crate::storage::Persistence;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// One batch pushed by the provider
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    /// Activity records in this delivery
    #[serde(default)]
    pub activities: Vec<WebhookActivity>,
}

/// One activity in a webhook delivery, attributed to a provider account
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookActivity {
    /// Provider external account identifier of the owner
    #[serde(default)]
    pub user_id: Option<String>,
    /// The activity record itself
    #[serde(flatten)]
    pub activity: ExternalActivity,
}

/// Processes pushed activity batches after acknowledgment
pub struct WebhookProcessor {
    ingestor: Arc<ActivityIngestor>,
    storage: Arc<dyn Persistence>,
}

impl WebhookProcessor {
    /// Create a processor over the shared ingestor and persistence seam
    pub fn new(ingestor: Arc<ActivityIngestor>, storage: Arc<dyn Persistence>) -> Self {
        Self { ingestor, storage }
    }

    /// Accept a raw webhook body and return immediately.
    ///
    /// Processing happens on a spawned task so the caller can acknowledge
    /// receipt without waiting; parse failures are logged and dropped.
    pub fn accept(self: &Arc<Self>, raw: serde_json::Value) {
        let processor = Arc::clone(self);
        tokio::spawn(async move {
            match serde_json::from_value::<WebhookPayload>(raw) {
                Ok(batch) => processor.process_batch(batch).await,
                Err(e) => warn!(error = %e, "dropping malformed webhook payload"),
            }
        });
    }

    /// Process a parsed batch. Exposed separately so tests can await it.
    pub async fn process_batch(&self, batch: WebhookPayload) {
        for item in batch.activities {
            let Some(account_id) = item.user_id.as_deref() else {
                debug!("webhook activity without account id, skipping");
                continue;
            };

            let user_id = match self.storage.find_user_by_external_account_id(account_id).await {
                Ok(Some(user_id)) => user_id,
                Ok(None) => {
                    debug!(account_id, "webhook for unknown account, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(account_id, error = %e, "user lookup failed for webhook activity");
                    continue;
                }
            };

            match self.ingestor.import_activity(user_id, &item.activity).await {
                ImportOutcome::Imported => {
                    debug!(activity_id = item.activity.activity_id, "webhook activity imported");
                }
                ImportOutcome::Skipped | ImportOutcome::FilteredOut => {}
                ImportOutcome::Failed(diagnostic) => {
                    warn!(diagnostic, "webhook activity import failed");
                }
            }
        }
    }

    /// Handshake response for the provider's GET-style verification probe.
    /// Idempotent; always succeeds.
    #[must_use]
    pub fn verification_ack() -> serde_json::Value {
        serde_json::json!({ "status": "ok" })
    }
}
