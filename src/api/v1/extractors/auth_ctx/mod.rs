/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト（AuthCtx）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor (なければ 401)
 * - MaybeAuthCtx (OptionalAuth 用, なければ None)
 */

mod core;
mod types;

pub use self::core::{AuthCtxExtractor, MaybeAuthCtx};
pub use self::types::AuthCtx;
