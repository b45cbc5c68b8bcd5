/*
 * Responsibility
 * - /users 系 handler (register / login / me)
 * - register / login は公開ルート。成功時にアクセストークンを発行する
 * - me は RequireAuth 配下。AuthCtx から users.id を引く
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::users::{AuthResponse, LoginRequest, RegisterRequest, UserResponse},
        extractors::{AuthCtxExtractor, JsonBody},
    },
    error::AppError,
    repos::{error::RepoError, user_repo},
    services::auth::password,
    state::AppState,
};

fn duplicate_user() -> AppError {
    AppError::conflict("USER_EXISTS", "Username or email already exists")
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("INVALID_CREDENTIALS", "Invalid username or password")
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let username = req.username.trim();
    let email = req.email.trim();

    if user_repo::exists_by_username_or_email(&state.db, username, email).await? {
        return Err(duplicate_user());
    }

    // argon2 は CPU を占有するので blocking pool で回す
    let plain = req.password;
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing task failed");
            AppError::Internal
        })??;

    let row = user_repo::create(&state.db, username, email, &password_hash)
        .await
        .map_err(|e| match e {
            RepoError::Conflict => duplicate_user(),
            other => AppError::from(other),
        })?;

    let token = state.tokens.issue(row.id, &row.username)?;
    tracing::info!(user_id = row.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from(row),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let Some(user) = user_repo::find_by_username(&state.db, req.username.trim()).await? else {
        return Err(invalid_credentials());
    };

    let plain = req.password;
    let stored = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || password::verify_password(&plain, &stored))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password verification task failed");
            AppError::Internal
        })?;

    if !verified {
        tracing::info!(user_id = user.id, "login rejected");
        return Err(invalid_credentials());
    }

    // レスポンスには更新後の last_login を返す
    let user = user_repo::touch_last_login(&state.db, user.id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    let token = state.tokens.issue(user.id, &user.username)?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::find_by_id(&state.db, ctx.user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(UserResponse::from(row)))
}
