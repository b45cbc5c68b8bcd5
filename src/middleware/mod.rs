/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth: Bearer トークン検証 (RequireAuth / OptionalAuth)
 * - http: request id / access log / body limit / timeout
 */
pub mod auth;
pub mod http;
