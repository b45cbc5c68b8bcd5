/*
 * Responsibility
 * - /posts 系 CRUD handler (すべて RequireAuth 配下)
 * - Path の post_id は数値のみ受け付ける (不正なら 400)
 * - 作成時の created_by は AuthCtx の username
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::posts::{CreatePostRequest, PostResponse, UpdatePostRequest},
        extractors::{AuthCtxExtractor, JsonBody},
    },
    error::AppError,
    repos::post_repo,
    state::AppState,
};

fn parse_post_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::bad_request("INVALID_POST_ID", "Invalid post ID"))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = post_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let row = post_repo::create(&state.db, &req.title, &req.content, &ctx.username).await?;
    tracing::info!(post_id = row.id, user_id = ctx.user_id, "post created");

    Ok((StatusCode::CREATED, Json(PostResponse::from(row))))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post_id = parse_post_id(&post_id)?;

    let row = post_repo::get(&state.db, post_id)
        .await?
        .ok_or(AppError::not_found("post"))?;

    Ok(Json(PostResponse::from(row)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    JsonBody(req): JsonBody<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let post_id = parse_post_id(&post_id)?;
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let row = post_repo::update(&state.db, post_id, &req.title, &req.content)
        .await?
        .ok_or(AppError::not_found("post"))?;

    Ok(Json(PostResponse::from(row)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let post_id = parse_post_id(&post_id)?;

    if post_repo::delete(&state.db, post_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("post"))
    }
}
