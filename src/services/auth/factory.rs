//! Factory: build the process-wide `TokenService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::TokenService;

pub fn build_token_service(config: &Config) -> Arc<TokenService> {
    tracing::info!(
        validity_seconds = config.token.validity().num_seconds(),
        "access token service ready"
    );
    Arc::new(TokenService::new(&config.token))
}
