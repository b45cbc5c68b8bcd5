/*
 * Responsibility
 * - handler が受け取る独自 extractor の公開
 * - auth_ctx: 認証済みユーザー / json_body: envelope 付きの JSON body
 */
pub mod auth_ctx;
pub mod json_body;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor, MaybeAuthCtx};
pub use json_body::JsonBody;
