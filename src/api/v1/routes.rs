/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /users/register, /users/login は公開
 * - /users/me, /posts 系は RequireAuth を route_layer で適用
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    health::health,
    posts::{create_post, delete_post, get_post, list_posts, update_post},
    users::{login, me, register},
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/users/register", post(register))
        .route("/users/login", post(login));

    let protected = Router::new()
        .route("/users/me", get(me))
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{post_id}",
            get(get_post).put(update_post).delete(delete_post),
        );

    public.merge(middleware::auth::require(protected, state.tokens.clone()))
}
