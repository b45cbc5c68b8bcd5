use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::middleware::auth::get_claims;

use super::AuthCtx;

/// Handler で、 AuthCtx を受け取るための extractor
/// RequireAuth が Claims を載せている前提
/// 見つからない場合は 401 を返す（ミドルウェア未設定の配線ミスも含む）
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match get_claims(&parts.extensions) {
            Some(claims) => Ok(Self(AuthCtx::from(claims))),
            None => {
                tracing::error!(
                    path = %parts.uri.path(),
                    "handler requires identity but no verified claims were attached"
                );
                Err(AppError::unauthorized("UNAUTHORIZED", "Unauthorized"))
            }
        }
    }
}

/// OptionalAuth 配下の handler 用。未認証なら None
pub struct MaybeAuthCtx(pub Option<AuthCtx>);

impl<S> FromRequestParts<S> for MaybeAuthCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(get_claims(&parts.extensions).map(AuthCtx::from)))
    }
}
