use actix_web::HttpRequest;
use anyhow::Result;

use super::token::TokenValidator;
use super::union::UnionAuthenticator;
use super::{Authenticator, AuthnResponse, Principal};

pub struct ChainAuthenticator<T: TokenValidator> {
    authenticators: Vec<UnionAuthenticator<T>>,
}

impl<T: TokenValidator> ChainAuthenticator<T> {
    pub fn new(authenticators: Vec<UnionAuthenticator<T>>) -> Self {
        Self { authenticators }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.authenticators.len()
    }

    #[cfg(test)]
    pub fn is_anonymous_enabled(&self) -> bool {
        self.authenticators
            .iter()
            .any(|authn| matches!(authn, UnionAuthenticator::Anonymous(_)))
    }
}

impl<T: TokenValidator + Sync + Send> Authenticator for ChainAuthenticator<T> {
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        mut principal: Option<Principal>,
    ) -> Result<AuthnResponse> {
        for authenticator in self.authenticators.iter() {
            let current = principal.take();
            match authenticator.authenticate_request(req, current.clone())? {
                AuthnResponse::Ok(resolved) => principal = Some(resolved),
                AuthnResponse::Continue => principal = current,
                AuthnResponse::Unauthenticated => return Ok(AuthnResponse::Unauthenticated),
            }
        }
        match principal {
            Some(principal) => Ok(AuthnResponse::Ok(principal)),
            None => Ok(AuthnResponse::Continue),
        }
    }
}
