/*
 * Responsibility
 * - アクセストークン (JWT, HS256) の発行と検証
 * - 署名アルゴリズムは HS256 に固定する (ヘッダの alg は信用しない)
 * - 失敗理由は TokenError の 4 種類のみ
 *
 * 秘密鍵やトークン本体はログに出さない
 */
use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::error::AppError;
use crate::services::auth::claims::{Claims, ClaimsRepr};

pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;
const TOKEN_ALGORITHM_NAME: &str = "HS256";

/// Why a token was refused. Every kind means "reject the request".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    MalformedToken,
    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token has expired")]
    ExpiredToken,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnsupportedAlgorithm
            }
            ErrorKind::ExpiredSignature => Self::ExpiredToken,
            _ => Self::MalformedToken,
        }
    }
}

/// Signing secret and token lifetime, loaded once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    validity: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>, validity: Duration) -> Self {
        Self {
            secret: secret.into(),
            validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("validity", &self.validity)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct TokenPayload<'a> {
    user_id: i64,
    username: &'a str,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct HeaderRepr {
    #[serde(default)]
    alg: Option<String>,
}

/// Issues and verifies HS256 access tokens.
///
/// - Keys are derived once from `TokenConfig` and shared read-only across requests.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("validity", &self.validity)
            .finish()
    }
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // exp is compared against our own clock in `verify_at`
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            validity: config.validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Issue a token for an already authenticated principal.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, AppError> {
        self.issue_at(user_id, username, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: i64,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expires_at = now.checked_add_signed(self.validity).ok_or_else(|| {
            error!(user_id, "token expiry overflows the calendar");
            AppError::Internal
        })?;

        let payload = TokenPayload {
            user_id,
            username,
            exp: expires_at.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(TOKEN_ALGORITHM), &payload, &self.encoding_key).map_err(
            |e| {
                error!(user_id, error = %e, "failed to sign access token");
                AppError::Internal
            },
        )
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// Order of checks: structure, algorithm pin, signature, expiry, claim shapes.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let alg = declared_algorithm(token)?;
        if alg != TOKEN_ALGORITHM_NAME {
            return Err(TokenError::UnsupportedAlgorithm);
        }

        // signature comparison happens inside the HMAC primitive (constant time)
        let data = jsonwebtoken::decode::<ClaimsRepr>(token, &self.decoding_key, &self.validation)?;
        let repr = data.claims;

        if repr.exp <= now.timestamp() {
            return Err(TokenError::ExpiredToken);
        }

        Claims::try_from(repr)
    }
}

/// Read the `alg` member of the header without trusting anything else.
fn declared_algorithm(token: &str) -> Result<String, TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::MalformedToken);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::MalformedToken)?;
    let header: HeaderRepr =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::MalformedToken)?;

    header.alg.ok_or(TokenError::MalformedToken)
}
