//! access token (Bearer JWT) 検証 → Claims を extensions に入れる
//!
//! - `require_auth`: ヘッダ欠落 / 形式不正 / 検証失敗はすべて 401 で打ち切る
//! - `optional_auth`: 失敗しても素通し。検証成功時のみ Claims を載せる
//!
//! どちらもトークン本体はログに出さない (失敗の種類のみ)

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use super::context;
use crate::error::AppError;
use crate::services::auth::{Claims, TokenError, TokenService};

const BEARER_PREFIX: &str = "Bearer ";

/// Why RequireAuth refused a request. Always rendered as 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingHeader,
    InvalidFormat,
    Expired,
    InvalidToken,
}

impl AuthRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingHeader => "Authorization header required",
            Self::InvalidFormat => "Invalid authorization format, Bearer token required",
            Self::Expired => "Token has expired",
            Self::InvalidToken => "Invalid token",
        }
    }
}

impl From<TokenError> for AuthRejection {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::ExpiredToken => Self::Expired,
            TokenError::MalformedToken
            | TokenError::UnsupportedAlgorithm
            | TokenError::InvalidSignature => Self::InvalidToken,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        AppError::unauthorized("UNAUTHORIZED", self.message()).into_response()
    }
}

/// Protect every route already added to `router`.
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/posts", get(list_posts));
/// let protected = middleware::auth::require(protected, state.tokens.clone());
/// ```
pub fn require<S>(router: Router<S>, tokens: Arc<TokenService>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(tokens, require_auth))
}

/// Attach identity when a valid token is presented, without requiring one.
pub fn optional<S>(router: Router<S>, tokens: Arc<TokenService>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(tokens, optional_auth))
}

pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let claims = match authenticate(req.headers(), &tokens) {
        Ok(claims) => claims,
        Err(rejection) => {
            tracing::warn!(
                ?rejection,
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by auth middleware"
            );
            return Err(rejection);
        }
    };

    tracing::debug!(user_id = claims.user_id(), "request authenticated");

    // middleware → extractor への受け渡し
    context::attach(req.extensions_mut(), claims);

    Ok(next.run(req).await)
}

pub async fn optional_auth(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(req.headers(), &tokens) {
        Ok(claims) => context::attach(req.extensions_mut(), claims),
        Err(AuthRejection::MissingHeader) => {}
        Err(rejection) => {
            tracing::debug!(?rejection, "optional auth ignored credentials");
        }
    }

    next.run(req).await
}

fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Claims, AuthRejection> {
    let token = bearer_token(headers)?;
    tokens.verify(token).map_err(|err| {
        tracing::debug!(error = ?err, "access token verification failed");
        AuthRejection::from(err)
    })
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = match headers.get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthRejection::MissingHeader),
    };

    value
        .to_str()
        .map_err(|_| AuthRejection::InvalidFormat)?
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthRejection::InvalidFormat)
}
