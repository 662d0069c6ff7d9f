use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::comment::{
        CommentResponse, CreateCommentRequest, ListCommentsParams, ListCommentsResponse,
        OwnerResponse, UpdateCommentRequest,
    },
    store::{DynCommentStore, Page},
    utils::html::clean_html,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Parses a required identifier. Malformed input never reaches the store.
fn parse_uid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::invalid_uuid())
}

/// Parses an optional parent identifier; absent, empty and nil all mean top-level.
fn parse_parent_uid(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => {
            let uid = parse_uid(raw)?;
            Ok((!uid.is_nil()).then_some(uid))
        }
    }
}

/// Resolves the effective page: 0 means the default size, sizes above the
/// configured maximum are clamped, negatives are rejected.
fn resolve_page(
    page_size: Option<i32>,
    page_number: Option<i32>,
    max_page_size: u32,
) -> Result<Page, AppError> {
    let size = u32::try_from(page_size.unwrap_or(0))
        .map_err(|_| AppError::InvalidArgument("page_size must not be negative".to_string()))?;
    let number = u32::try_from(page_number.unwrap_or(0))
        .map_err(|_| AppError::InvalidArgument("page_number must not be negative".to_string()))?;

    let size = match size {
        0 => DEFAULT_PAGE_SIZE,
        size => size.min(max_page_size.max(1)),
    };

    Ok(Page::new(size, number))
}

fn echo_paging(value: u32) -> Result<i32, AppError> {
    i32::try_from(value)
        .map_err(|_| AppError::Internal(format!("page value {} exceeds i32", value)))
}

fn normalize_body(body: String, config: &Config) -> String {
    if config.sanitize_bodies {
        clean_html(&body)
    } else {
        body
    }
}

/// List comments of a post, newest first.
/// Scoped to direct replies of `parent_uid` when given, top-level otherwise.
pub async fn list_comments(
    State(store): State<DynCommentStore>,
    State(config): State<Config>,
    Path(post_uid): Path<String>,
    params: Result<Query<ListCommentsParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let post_uid = parse_uid(&post_uid)?;
    let parent_uid = parse_parent_uid(params.parent_uid.as_deref())?;
    let page = resolve_page(params.page_size, params.page_number, config.max_page_size)?;

    let comments = store.list_by_post(post_uid, parent_uid, page).await?;

    Ok(Json(ListCommentsResponse {
        comments: comments.into_iter().map(CommentResponse::from).collect(),
        page_size: echo_paging(page.size)?,
        page_number: echo_paging(page.number)?,
    }))
}

/// Create a new comment on a post, optionally as a reply.
pub async fn create_comment(
    State(store): State<DynCommentStore>,
    State(config): State<Config>,
    Path(post_uid): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let post_uid = parse_uid(&post_uid)?;
    let parent_uid = parse_parent_uid(payload.parent_uid.as_deref())?;
    let user_uid = parse_uid(&payload.user_uid)?;
    payload
        .validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let body = normalize_body(payload.body, &config);
    let comment = store.create(post_uid, &body, parent_uid, user_uid).await?;

    tracing::info!(uid = %comment.uid, post_uid = %post_uid, "Comment created");

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

/// Get a single comment, including content-removed ones.
pub async fn get_comment(
    State(store): State<DynCommentStore>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let uid = parse_uid(&uid)?;
    let comment = store.get(uid).await?;
    Ok(Json(CommentResponse::from(comment)))
}

/// Replace the body of a comment whose content has not been removed.
pub async fn update_comment(
    State(store): State<DynCommentStore>,
    State(config): State<Config>,
    Path(uid): Path<String>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let uid = parse_uid(&uid)?;
    payload
        .validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let body = normalize_body(payload.body, &config);
    store.update(uid, &body).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a comment's content (Soft Delete). The row and its owner remain.
pub async fn remove_content(
    State(store): State<DynCommentStore>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let uid = parse_uid(&uid)?;
    store.remove_content(uid).await?;

    tracing::info!(uid = %uid, "Comment content removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a comment row (Hard Delete).
pub async fn delete_comment(
    State(store): State<DynCommentStore>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let uid = parse_uid(&uid)?;
    store.delete(uid).await?;

    tracing::info!(uid = %uid, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Get the user who wrote a comment.
pub async fn get_owner(
    State(store): State<DynCommentStore>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let uid = parse_uid(&uid)?;
    let owner_uid = store.get_owner(uid).await?;
    Ok(Json(OwnerResponse { owner_uid }))
}
