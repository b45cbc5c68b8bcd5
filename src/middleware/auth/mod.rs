//! Bearer-token authentication.
//!
//! - `access`: the RequireAuth / OptionalAuth layers
//! - `context`: the request-scoped slot holding verified `Claims`

mod access;
mod context;

pub use access::{AuthRejection, optional, optional_auth, require, require_auth};
pub use context::get_claims;
