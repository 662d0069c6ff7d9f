//! HashMap-backed comment store for tests and local development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use uuid::Uuid;

use super::{CommentStore, Page, StoreError, StoreResult};
use crate::models::comment::Comment;

/// In-memory comment store. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryCommentStore {
    comments: Arc<RwLock<HashMap<Uuid, Comment>>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<Uuid, Comment>>> {
        self.comments
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<Uuid, Comment>>> {
        self.comments
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    /// Applies `mutate` to a live (not content-removed) comment.
    fn modify_live<F>(&self, uid: Uuid, mutate: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Comment),
    {
        let mut comments = self.write()?;
        match comments.get_mut(&uid) {
            Some(comment) if !comment.is_deleted => {
                mutate(comment);
                comment.modified_at = Utc::now().trunc_subsecs(6).max(comment.created_at);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn list_by_post(
        &self,
        post_uid: Uuid,
        parent_uid: Option<Uuid>,
        page: Page,
    ) -> StoreResult<Vec<Comment>> {
        let comments = self.read()?;
        let mut matching: Vec<&Comment> = comments
            .values()
            .filter(|c| c.post_uid == post_uid && c.parent_uid == parent_uid)
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.uid.cmp(&a.uid))
        });

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        post_uid: Uuid,
        body: &str,
        parent_uid: Option<Uuid>,
        user_uid: Uuid,
    ) -> StoreResult<Comment> {
        let now = Utc::now().trunc_subsecs(6);
        let comment = Comment {
            uid: Uuid::new_v4(),
            user_uid,
            post_uid,
            body: body.to_string(),
            parent_uid,
            created_at: now,
            modified_at: now,
            is_deleted: false,
        };

        let mut comments = self.write()?;
        if comments.contains_key(&comment.uid) {
            return Err(StoreError::NotCreated);
        }
        comments.insert(comment.uid, comment.clone());
        Ok(comment)
    }

    async fn get(&self, uid: Uuid) -> StoreResult<Comment> {
        self.read()?.get(&uid).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, uid: Uuid, body: &str) -> StoreResult<()> {
        self.modify_live(uid, |comment| comment.body = body.to_string())
    }

    async fn remove_content(&self, uid: Uuid) -> StoreResult<()> {
        self.modify_live(uid, |comment| comment.is_deleted = true)
    }

    async fn delete(&self, uid: Uuid) -> StoreResult<()> {
        self.write()?
            .remove(&uid)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn get_owner(&self, uid: Uuid) -> StoreResult<Uuid> {
        self.read()?
            .get(&uid)
            .map(|c| c.user_uid)
            .ok_or(StoreError::NotFound)
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}
