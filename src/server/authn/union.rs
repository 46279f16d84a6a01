use actix_web::HttpRequest;
use anyhow::Result;

use super::anonymous::AnonymousAuthenticator;
use super::bearer_token::BearerTokenAuthenticator;
use super::token::TokenValidator;
use super::{Authenticator, AuthnResponse, Principal};

pub enum UnionAuthenticator<T: TokenValidator> {
    BearerToken(BearerTokenAuthenticator<T>),
    Anonymous(AnonymousAuthenticator),
}

impl<T: TokenValidator + Sync + Send> Authenticator for UnionAuthenticator<T> {
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        principal: Option<Principal>,
    ) -> Result<AuthnResponse> {
        match self {
            UnionAuthenticator::BearerToken(authn) => authn.authenticate_request(req, principal),
            UnionAuthenticator::Anonymous(authn) => authn.authenticate_request(req, principal),
        }
    }
}
