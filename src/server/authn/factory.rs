use anyhow::Result;
use log::{info, warn};

use super::anonymous::AnonymousAuthenticator;
use super::bearer_token::BearerTokenAuthenticator;
use super::chain::ChainAuthenticator;
use super::config::AuthnConfig;
use super::token::factory::TokenFactory;
use super::token::jwt::JwtTokenValidator;
use super::union::UnionAuthenticator;

/// Builds the authentication chain:
/// 1. Bearer token authentication (always enabled)
/// 2. Anonymous fallback (if enabled in config)
pub struct AuthnFactory;

impl AuthnFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_authenticator(
        &self,
        cfg: &AuthnConfig,
        token_factory: &TokenFactory,
    ) -> Result<ChainAuthenticator<JwtTokenValidator>> {
        let mut authenticators = Vec::new();

        let jwt = token_factory.build_token_validator()?;
        let token_authn = BearerTokenAuthenticator::new(jwt);
        authenticators.push(UnionAuthenticator::BearerToken(token_authn));

        if cfg.allow_anonymous {
            warn!("Anonymous access is enabled, requests without token are evaluated with no claims");
            authenticators.push(UnionAuthenticator::Anonymous(AnonymousAuthenticator::new()));
        } else {
            info!("Anonymous access is disabled, requests without token are rejected");
        }

        Ok(ChainAuthenticator::new(authenticators))
    }
}
