/*
 * Responsibility
 * - 検証済みトークンから取り出した主体 (Claims) の型
 * - 生のペイロード (ClaimsRepr) からの変換と形式チェック
 *
 * Claims は TokenService::verify の成功時にのみ生成される
 */
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::services::auth::token_service::TokenError;

/// Identity asserted by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    user_id: i64,
    username: String,
    expires_at: DateTime<Utc>,
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

/// Payload as it appears on the wire, before shape checks.
///
/// `user_id` stays a `serde_json::Number` so a float or an out-of-range value
/// is rejected instead of being rounded into some other user's id.
#[derive(Debug, Deserialize)]
pub(crate) struct ClaimsRepr {
    #[serde(default)]
    pub user_id: Option<serde_json::Number>,
    #[serde(default)]
    pub username: Option<String>,
    pub exp: i64,
}

impl TryFrom<ClaimsRepr> for Claims {
    type Error = TokenError;

    fn try_from(value: ClaimsRepr) -> Result<Self, Self::Error> {
        let user_id = value
            .user_id
            .as_ref()
            .and_then(serde_json::Number::as_i64)
            .filter(|id| *id >= 0)
            .ok_or(TokenError::MalformedToken)?;

        let username = value.username.ok_or(TokenError::MalformedToken)?;

        let expires_at = Utc
            .timestamp_opt(value.exp, 0)
            .single()
            .ok_or(TokenError::MalformedToken)?;

        Ok(Self {
            user_id,
            username,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repr(value: serde_json::Value) -> ClaimsRepr {
        serde_json::from_value(value).expect("repr")
    }

    #[test]
    fn converts_well_formed_payload() {
        let claims = Claims::try_from(repr(json!({
            "user_id": 42,
            "username": "alice",
            "exp": 1_900_000_000,
        })))
        .expect("claims");

        assert_eq!(claims.user_id(), 42);
        assert_eq!(claims.username(), "alice");
        assert_eq!(claims.expires_at().timestamp(), 1_900_000_000);
    }

    #[test]
    fn keeps_large_ids_exact() {
        let id = (1_i64 << 53) + 1;
        let claims = Claims::try_from(repr(json!({
            "user_id": id,
            "username": "bob",
            "exp": 1_900_000_000,
        })))
        .expect("claims");

        assert_eq!(claims.user_id(), id);
    }

    #[test]
    fn rejects_float_user_id() {
        let err = Claims::try_from(repr(json!({
            "user_id": 42.5,
            "username": "alice",
            "exp": 1_900_000_000,
        })))
        .expect_err("float id");

        assert_eq!(err, TokenError::MalformedToken);
    }

    #[test]
    fn rejects_negative_user_id() {
        let err = Claims::try_from(repr(json!({
            "user_id": -1,
            "username": "alice",
            "exp": 1_900_000_000,
        })))
        .expect_err("negative id");

        assert_eq!(err, TokenError::MalformedToken);
    }

    #[test]
    fn rejects_missing_fields() {
        let no_id = repr(json!({ "username": "alice", "exp": 1_900_000_000 }));
        assert_eq!(Claims::try_from(no_id), Err(TokenError::MalformedToken));

        let no_name = repr(json!({ "user_id": 7, "exp": 1_900_000_000 }));
        assert_eq!(Claims::try_from(no_name), Err(TokenError::MalformedToken));
    }
}
