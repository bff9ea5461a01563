use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    recipe::{NewSavedRecipe, SavedRecipe},
    user::User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("record encoding failed: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("{0}")]
    Conflict(String),
}

impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Backend(err.into_string())
    }
}

impl From<std::str::Utf8Error> for StoreError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Backend(format!("non-utf8 key: {err}"))
    }
}

/// A user's saved recipe collection.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Assigns `id` and `created_ts` and persists the record.
    async fn insert(&self, recipe: NewSavedRecipe) -> Result<SavedRecipe, StoreError>;

    /// Newest first.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<SavedRecipe>, StoreError>;

    /// `false` when no recipe with that id belongs to `owner`.
    async fn delete(&self, owner: &str, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] if the email is already registered.
    async fn create_user(&self, user: User) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn load_user(&self, id: &str) -> Result<Option<User>, StoreError>;
}

pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Wall-clock millis, strictly increasing within the process so that
/// records created in the same millisecond still sort in creation order.
pub(crate) fn now_millis() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let prev = LAST_MILLIS
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(prev + 1)
}

pub(crate) fn email_taken(email: &str) -> StoreError {
    StoreError::Conflict(format!("Email already registered: {email}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_strictly_increase() {
        let stamps: Vec<i64> = (0..1000).map(|_| now_millis()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
