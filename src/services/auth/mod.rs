pub mod claims;
pub mod factory;
pub mod password;
pub mod token_service;

pub use claims::Claims;
pub use factory::build_token_service;
pub use token_service::{TokenConfig, TokenError, TokenService};
