use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Comment {
    pub uid: Uuid,
    pub user_uid: Uuid,
    pub post_uid: Uuid,
    pub body: String,
    /// `None` for a top-level comment attached directly to the post.
    pub parent_uid: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub is_deleted: bool,
}

/// Wire form of a comment.
///
/// Top-level comments carry the nil UUID as `parent_uid`, and a
/// content-removed comment is sent with an empty body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub uid: Uuid,
    pub user_uid: Uuid,
    pub post_uid: Uuid,
    pub body: String,
    pub parent_uid: Uuid,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        let body = if comment.is_deleted {
            String::new()
        } else {
            comment.body
        };

        Self {
            uid: comment.uid,
            user_uid: comment.user_uid,
            post_uid: comment.post_uid,
            body,
            parent_uid: comment.parent_uid.unwrap_or(Uuid::nil()),
            created_at: comment.created_at,
            modified_at: comment.modified_at,
            is_deleted: comment.is_deleted,
        }
    }
}

/// Query parameters for listing comments of a post.
#[derive(Debug, Default, Deserialize)]
pub struct ListCommentsParams {
    /// Parent comment to list replies of. Absent or empty means top-level.
    pub parent_uid: Option<String>,
    /// Number of items per page (0 or absent: default 10).
    pub page_size: Option<i32>,
    /// Zero-based page index.
    pub page_number: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListCommentsResponse {
    pub comments: Vec<CommentResponse>,
    pub page_size: i32,
    pub page_number: i32,
}

/// DTO for creating a new comment.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(max = 10000, message = "Comment must be at most 10000 characters"))]
    pub body: String,

    /// Optional: the UID of the comment being replied to.
    #[serde(default)]
    pub parent_uid: Option<String>,

    pub user_uid: String,
}

/// DTO for replacing a comment body.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(max = 10000, message = "Comment must be at most 10000 characters"))]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub owner_uid: Uuid,
}
