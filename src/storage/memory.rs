// ABOUTME: In-memory Persistence implementation for tests and local development
// ABOUTME: RwLock-guarded maps with the same unique-constraint semantics as the real store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Breakline

//! In-memory persistence backend

use super::{Persistence, StorageError};
use crate::models::SessionDraft;
use crate::oauth::WearableCredential;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory store. Enforces the unique constraint on external activity ids
/// the way the real backend does.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<Vec<(i64, SessionDraft)>>,
    credentials: RwLock<HashMap<Uuid, WearableCredential>>,
    account_index: RwLock<HashMap<String, Uuid>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping from a provider external account id to a user
    pub async fn link_external_account(&self, external_account_id: &str, user_id: Uuid) {
        self.account_index
            .write()
            .await
            .insert(external_account_id.to_owned(), user_id);
    }

    /// Number of stored session drafts
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// All stored drafts, for assertions
    pub async fn sessions(&self) -> Vec<SessionDraft> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(_, d)| d.clone())
            .collect()
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn create_session_draft(&self, draft: SessionDraft) -> Result<i64, StorageError> {
        let mut sessions = self.sessions.write().await;
        if sessions
            .iter()
            .any(|(_, d)| d.external_activity_id == draft.external_activity_id)
        {
            return Err(StorageError::Conflict(format!(
                "session already imported for activity {}",
                draft.external_activity_id
            )));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        sessions.push((id, draft));
        Ok(id)
    }

    async fn find_session_by_external_activity_id(
        &self,
        external_activity_id: &str,
    ) -> Result<Option<SessionDraft>, StorageError> {
        Ok(self
            .sessions
            .read()
            .await
            .iter()
            .find(|(_, d)| d.external_activity_id == external_activity_id)
            .map(|(_, d)| d.clone()))
    }

    async fn get_credential(
        &self,
        user_id: Uuid,
    ) -> Result<Option<WearableCredential>, StorageError> {
        Ok(self.credentials.read().await.get(&user_id).cloned())
    }

    async fn upsert_credential(
        &self,
        user_id: Uuid,
        credential: WearableCredential,
    ) -> Result<(), StorageError> {
        self.credentials.write().await.insert(user_id, credential);
        Ok(())
    }

    async fn delete_credential(&self, user_id: Uuid) -> Result<(), StorageError> {
        self.credentials.write().await.remove(&user_id);
        Ok(())
    }

    async fn find_user_by_external_account_id(
        &self,
        external_account_id: &str,
    ) -> Result<Option<Uuid>, StorageError> {
        Ok(self.account_index.read().await.get(external_account_id).copied())
    }
}
