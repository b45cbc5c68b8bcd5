/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証ロジックは middleware/services 側の責務
 * - roles / scopes は持たない (認可はしない)
 */
use crate::services::auth::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は users.id
/// - `username` は投稿の created_by に使う
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub username: String,
}

impl From<&Claims> for AuthCtx {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id(),
            username: claims.username().to_string(),
        }
    }
}
