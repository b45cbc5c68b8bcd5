//! Request-scoped slot for verified `Claims`.
//!
//! The slot type is private to this module, so nothing outside the auth
//! middleware can write to it, and another component storing its own `Claims`
//! in the extensions cannot be mistaken for a verified identity.

use axum::http::Extensions;

use crate::services::auth::Claims;

#[derive(Clone)]
struct VerifiedClaims(Claims);

pub(super) fn attach(extensions: &mut Extensions, claims: Claims) {
    extensions.insert(VerifiedClaims(claims));
}

/// Claims attached by the auth middleware, if it ran and the token verified.
pub fn get_claims(extensions: &Extensions) -> Option<&Claims> {
    extensions.get::<VerifiedClaims>().map(|slot| &slot.0)
}
