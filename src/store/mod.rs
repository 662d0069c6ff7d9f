//! Comment persistence: the store capability and its adapters.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::comment::Comment;

pub use memory::InMemoryCommentStore;
pub use postgres::PgCommentStore;

/// Failures a comment store can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched, or the row is in a state that blocks the mutation.
    #[error("comment not found")]
    NotFound,

    /// The insert reported zero affected rows.
    #[error("comment not created")]
    NotCreated,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A zero-based, offset-paginated window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub size: u32,
    pub number: u32,
}

impl Page {
    pub fn new(size: u32, number: u32) -> Self {
        Self { size, number }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number).saturating_mul(i64::from(self.size))
    }
}

/// Durable storage of comments. Implementations must be safe to call from
/// many requests at once; they add no locking beyond what the backend does.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Comments of `post_uid` whose parent is exactly `parent_uid`
    /// (`None` = top-level), newest first.
    async fn list_by_post(
        &self,
        post_uid: Uuid,
        parent_uid: Option<Uuid>,
        page: Page,
    ) -> StoreResult<Vec<Comment>>;

    async fn create(
        &self,
        post_uid: Uuid,
        body: &str,
        parent_uid: Option<Uuid>,
        user_uid: Uuid,
    ) -> StoreResult<Comment>;

    /// Fetches a comment whether or not its content was removed.
    async fn get(&self, uid: Uuid) -> StoreResult<Comment>;

    /// Replaces the body of a comment that has not been content-removed.
    async fn update(&self, uid: Uuid, body: &str) -> StoreResult<()>;

    /// Marks a comment as deleted. A second call yields `NotFound`.
    async fn remove_content(&self, uid: Uuid) -> StoreResult<()>;

    /// Physically removes the row, regardless of its deleted flag.
    async fn delete(&self, uid: Uuid) -> StoreResult<()>;

    async fn get_owner(&self, uid: Uuid) -> StoreResult<Uuid>;

    async fn health_check(&self) -> StoreResult<()>;
}

pub type DynCommentStore = Arc<dyn CommentStore>;
