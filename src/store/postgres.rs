//! PostgreSQL-backed comment store.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{CommentStore, Page, StoreError, StoreResult};
use crate::models::comment::Comment;

const COMMENT_COLUMNS: &str =
    "uid, user_uid, post_uid, body, parent_uid, created_at, modified_at, is_deleted";

pub struct PgCommentStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgCommentStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Runs a single round-trip, failing with `Storage` once the timeout elapses.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(|e| {
                tracing::error!("{} failed: {:?}", op, e);
                StoreError::from(e)
            }),
            Err(_) => {
                tracing::error!("{} timed out after {:?}", op, self.timeout);
                Err(StoreError::Storage(format!(
                    "{} timed out after {:?}",
                    op, self.timeout
                )))
            }
        }
    }

    /// Shared tail of `update` and `remove_content`: only live rows match,
    /// and zero affected rows means not found.
    async fn guarded_update(
        &self,
        op: &'static str,
        mut builder: QueryBuilder<'_, Postgres>,
        uid: Uuid,
    ) -> StoreResult<()> {
        builder.push(", modified_at = GREATEST(");
        builder.push_bind(Utc::now());
        builder.push(", created_at) WHERE uid = ");
        builder.push_bind(uid);
        builder.push(" AND is_deleted = FALSE");

        let result = self.bounded(op, builder.build().execute(&self.pool)).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn list_by_post(
        &self,
        post_uid: Uuid,
        parent_uid: Option<Uuid>,
        page: Page,
    ) -> StoreResult<Vec<Comment>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
        builder.push(COMMENT_COLUMNS);
        builder.push(" FROM comments WHERE post_uid = ");
        builder.push_bind(post_uid);

        match parent_uid {
            Some(parent_uid) => {
                builder.push(" AND parent_uid = ");
                builder.push_bind(parent_uid);
            }
            None => {
                builder.push(" AND parent_uid IS NULL");
            }
        }

        builder.push(" ORDER BY created_at DESC, uid DESC LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        self.bounded(
            "list comments",
            builder.build_query_as::<Comment>().fetch_all(&self.pool),
        )
        .await
    }

    async fn create(
        &self,
        post_uid: Uuid,
        body: &str,
        parent_uid: Option<Uuid>,
        user_uid: Uuid,
    ) -> StoreResult<Comment> {
        // Postgres keeps microseconds; truncate so the returned row matches later reads.
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

        let result = self
            .bounded(
                "create comment",
                sqlx::query(
                    r#"
                    INSERT INTO comments (uid, user_uid, post_uid, body, parent_uid, created_at, modified_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(comment.uid)
                .bind(comment.user_uid)
                .bind(comment.post_uid)
                .bind(&comment.body)
                .bind(comment.parent_uid)
                .bind(comment.created_at)
                .bind(comment.modified_at)
                .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotCreated);
        }

        Ok(comment)
    }

    async fn get(&self, uid: Uuid) -> StoreResult<Comment> {
        let query = format!("SELECT {} FROM comments WHERE uid = $1", COMMENT_COLUMNS);
        self.bounded(
            "get comment",
            sqlx::query_as::<_, Comment>(&query)
                .bind(uid)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn update(&self, uid: Uuid, body: &str) -> StoreResult<()> {
        let mut builder = QueryBuilder::new("UPDATE comments SET body = ");
        builder.push_bind(body);
        self.guarded_update("update comment", builder, uid).await
    }

    async fn remove_content(&self, uid: Uuid) -> StoreResult<()> {
        let builder = QueryBuilder::new("UPDATE comments SET is_deleted = TRUE");
        self.guarded_update("remove comment content", builder, uid).await
    }

    async fn delete(&self, uid: Uuid) -> StoreResult<()> {
        let result = self
            .bounded(
                "delete comment",
                sqlx::query("DELETE FROM comments WHERE uid = $1")
                    .bind(uid)
                    .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_owner(&self, uid: Uuid) -> StoreResult<Uuid> {
        self.bounded(
            "get comment owner",
            sqlx::query_scalar::<_, Uuid>("SELECT user_uid FROM comments WHERE uid = $1")
                .bind(uid)
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.bounded(
            "health check",
            sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool),
        )
        .await
        .map(|_| ())
    }
}
