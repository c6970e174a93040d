// ABOUTME: Persistence collaborator seam for session drafts, credentials, and user lookup
// ABOUTME: Async trait consumed by the OAuth manager and ingestion pipeline; backed externally
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! Persistence interfaces
//!
//! The relational store lives outside this crate; the core talks to it
//! through [`Persistence`]. The store is assumed to provide read-committed
//! isolation and a unique constraint on the external-activity-id dedup key.

pub mod memory;

use crate::models::SessionDraft;
use crate::oauth::WearableCredential;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence-layer failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Unique-constraint violation, e.g. a draft already exists for the
    /// external activity id
    #[error("conflict: {0}")]
    Conflict(String),
    /// Any other backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// External persistence collaborator
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Persist a session draft, returning its assigned id.
    ///
    /// # Errors
    /// [`StorageError::Conflict`] when a draft already references the same
    /// external activity id.
    async fn create_session_draft(&self, draft: SessionDraft) -> Result<i64, StorageError>;

    /// Look up a previously imported draft by external activity id
    async fn find_session_by_external_activity_id(
        &self,
        external_activity_id: &str,
    ) -> Result<Option<SessionDraft>, StorageError>;

    /// Fetch the stored wearable credential for a user
    async fn get_credential(&self, user_id: Uuid)
        -> Result<Option<WearableCredential>, StorageError>;

    /// Create or replace the wearable credential for a user
    async fn upsert_credential(
        &self,
        user_id: Uuid,
        credential: WearableCredential,
    ) -> Result<(), StorageError>;

    /// Delete the wearable credential for a user, if any
    async fn delete_credential(&self, user_id: Uuid) -> Result<(), StorageError>;

    /// Resolve a provider external account id to a platform user
    async fn find_user_by_external_account_id(
        &self,
        external_account_id: &str,
    ) -> Result<Option<Uuid>, StorageError>;
}
