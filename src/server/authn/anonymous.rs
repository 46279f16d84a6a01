use actix_web::HttpRequest;
use anyhow::Result;

use super::{Authenticator, AuthnResponse, Principal};

/// Fallback at the end of the chain: callers without credentials become an
/// anonymous principal with no claims, so policies decide what they may do.
pub struct AnonymousAuthenticator;

impl AnonymousAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

impl Authenticator for AnonymousAuthenticator {
    fn authenticate_request(
        &self,
        _req: &HttpRequest,
        principal: Option<Principal>,
    ) -> Result<AuthnResponse> {
        if let Some(principal) = principal {
            return Ok(AuthnResponse::Ok(principal));
        }

        Ok(AuthnResponse::Ok(Principal::anonymous()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::types::claim::Claim;

    #[test]
    fn test_anonymous() {
        let authn = AnonymousAuthenticator::new();
        let req = TestRequest::default().to_http_request();

        match authn.authenticate_request(&req, None).unwrap() {
            AuthnResponse::Ok(principal) => {
                assert!(principal.is_anonymous);
                assert!(principal.claims.is_empty());
            }
            resp => panic!("unexpected response: {resp:?}"),
        }

        let known = Principal::new("alice", vec![Claim::permission("Read")]);
        match authn.authenticate_request(&req, Some(known.clone())).unwrap() {
            AuthnResponse::Ok(principal) => assert_eq!(principal, known),
            resp => panic!("unexpected response: {resp:?}"),
        }
    }
}
