use crate::models::{MatchRecord, ProfileDocument};
use std::sync::Arc;
use thiserror::Error;

/// Failure surfaced by the backing document store. Opaque to the
/// reconciler; the underlying message is kept for diagnostics.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from the like/match reconciliation flow.
///
/// The `Display` text of each variant is the user-facing message body;
/// the HTTP layer maps variants to status codes.
#[derive(Debug, Error)]
pub enum LikeError {
    #[error("Invalid payload.")]
    InvalidPayload,

    #[error("User does not exist.")]
    ActorNotFound,

    #[error("Liked user does not exist.")]
    TargetNotFound,

    #[error("A like for this user already exists.")]
    DuplicateLike,

    #[error("{0}")]
    Backend(#[from] StoreError),
}

/// Outcome of a successful `record_like` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    LikeRecorded,
    MatchDetected,
}

/// Abstraction over the document store operations the reconciler needs.
///
/// The actor and the target are fetched through separate methods because
/// the deployed store reads them from different collections (`users` for
/// the acting subject, `test-users` for the like target). Implemented by
/// `FirestoreClient` in production and by an in-memory fake in tests.
#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Fetch the acting subject's profile, `None` when absent.
    async fn fetch_actor(&self, user_id: &str) -> Result<Option<ProfileDocument>, StoreError>;

    /// Fetch the like target's profile, `None` when absent.
    async fn fetch_target(&self, user_id: &str) -> Result<Option<ProfileDocument>, StoreError>;

    /// Add `liked_user_id` to the actor's `likes` set. Set-union
    /// semantics: the store never stores a duplicate entry.
    async fn append_like(&self, user_id: &str, liked_user_id: &str) -> Result<(), StoreError>;

    /// Create a match record for the pair, with a store-assigned
    /// creation timestamp.
    async fn create_match(&self, user1: &str, user2: &str) -> Result<MatchRecord, StoreError>;
}

impl<S: ProfileStore + Sync> ProfileStore for Arc<S> {
    async fn fetch_actor(&self, user_id: &str) -> Result<Option<ProfileDocument>, StoreError> {
        (**self).fetch_actor(user_id).await
    }

    async fn fetch_target(&self, user_id: &str) -> Result<Option<ProfileDocument>, StoreError> {
        (**self).fetch_target(user_id).await
    }

    async fn append_like(&self, user_id: &str, liked_user_id: &str) -> Result<(), StoreError> {
        (**self).append_like(user_id, liked_user_id).await
    }

    async fn create_match(&self, user1: &str, user2: &str) -> Result<MatchRecord, StoreError> {
        (**self).create_match(user1, user2).await
    }
}

/// Like/match reconciler
///
/// Records one-way likes and creates a match record when reciprocity is
/// detected. All shared state lives in the injected store; the
/// reconciler itself holds nothing mutable.
#[derive(Debug, Clone)]
pub struct LikeReconciler<S> {
    store: S,
}

impl<S: ProfileStore> LikeReconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record that `acting_user_id` likes `target_user_id`.
    ///
    /// Validation happens before any mutation: non-empty ids, both
    /// profiles present (actor checked first), no duplicate edge. On
    /// success the actor's `likes` set gains the target id; if the
    /// target's `likes` already contained the actor, a match record is
    /// also created and `MatchDetected` is returned.
    ///
    /// Reciprocity is judged from the target document as read *before*
    /// the like is persisted. A like from the target landing between
    /// that read and the write is not observed until the target's own
    /// next call, which then detects the match from its side.
    ///
    /// Store failures are not retried. If match creation fails after
    /// the like write committed, the like persists; there is no
    /// compensating rollback.
    pub async fn record_like(
        &self,
        acting_user_id: &str,
        target_user_id: &str,
    ) -> Result<LikeOutcome, LikeError> {
        if acting_user_id.is_empty() || target_user_id.is_empty() {
            return Err(LikeError::InvalidPayload);
        }

        let actor = self.store.fetch_actor(acting_user_id).await?;
        let target = self.store.fetch_target(target_user_id).await?;

        let actor = actor.ok_or(LikeError::ActorNotFound)?;
        let target = target.ok_or(LikeError::TargetNotFound)?;

        if actor.has_liked(target_user_id) {
            return Err(LikeError::DuplicateLike);
        }

        self.store.append_like(acting_user_id, target_user_id).await?;

        if target.has_liked(acting_user_id) {
            let record = self
                .store
                .create_match(acting_user_id, target_user_id)
                .await?;

            tracing::info!(
                "Match detected: {} <-> {} (record {})",
                acting_user_id,
                target_user_id,
                record.id
            );

            return Ok(LikeOutcome::MatchDetected);
        }

        tracing::debug!("Like recorded: {} -> {}", acting_user_id, target_user_id);

        Ok(LikeOutcome::LikeRecorded)
    }
}
