use actix_web::http::header;
use actix_web::HttpRequest;
use anyhow::{bail, Result};
use log::debug;

use super::token::TokenValidator;
use super::{Authenticator, AuthnResponse, Principal};

pub struct BearerTokenAuthenticator<T: TokenValidator> {
    validator: T,
}

impl<T: TokenValidator> BearerTokenAuthenticator<T> {
    pub fn new(validator: T) -> Self {
        Self { validator }
    }
}

impl<T: TokenValidator + Sync + Send> Authenticator for BearerTokenAuthenticator<T> {
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        _principal: Option<Principal>,
    ) -> Result<AuthnResponse> {
        let auth = match req.headers().get(header::AUTHORIZATION) {
            Some(auth) => match auth.to_str() {
                Ok(auth) => auth.trim().to_string(),
                Err(_) => return Ok(AuthnResponse::Continue),
            },
            None => return Ok(AuthnResponse::Continue),
        };

        if auth.is_empty() {
            return Ok(AuthnResponse::Continue);
        }

        let mut iter = auth.split_whitespace();
        let scheme = match iter.next() {
            Some(scheme) => scheme,
            None => return Ok(AuthnResponse::Unauthenticated),
        };
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Ok(AuthnResponse::Unauthenticated);
        }

        let token = match iter.next() {
            Some(token) => token,
            None => return Ok(AuthnResponse::Unauthenticated),
        };

        let principal = match self.validator.validate_token(token) {
            Ok(principal) => principal,
            Err(e) => {
                debug!("Reject bearer token: {e:#}");
                return Ok(AuthnResponse::Unauthenticated);
            }
        };
        if principal.name.is_empty() {
            bail!("empty subject in validated token");
        }

        Ok(AuthnResponse::Ok(principal))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::server::authn::token::factory::TokenFactory;
    use crate::server::authn::token::TokenGenerator;
    use crate::types::claim::Claim;

    fn authenticate(header: Option<&str>) -> AuthnResponse {
        let factory = TokenFactory::new_test();
        let authn = BearerTokenAuthenticator::new(factory.build_token_validator().unwrap());

        let mut req = TestRequest::default();
        if let Some(value) = header {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        authn
            .authenticate_request(&req.to_http_request(), None)
            .unwrap()
    }

    #[test]
    fn test_bearer_token() {
        let generator = TokenFactory::new_test().build_token_generator().unwrap();
        let claims = vec![Claim::permission("Read"), Claim::permission("Write")];
        let token = generator
            .generate_token(String::from("alice"), claims.clone())
            .unwrap();

        let header = format!("Bearer {}", token.token);
        match authenticate(Some(&header)) {
            AuthnResponse::Ok(principal) => {
                assert_eq!(principal.name, "alice");
                assert_eq!(principal.claims, claims);
                assert!(!principal.is_anonymous);
            }
            resp => panic!("unexpected response: {resp:?}"),
        }

        // Scheme is case-insensitive
        let header = format!("bearer {}", token.token);
        assert!(matches!(authenticate(Some(&header)), AuthnResponse::Ok(_)));

        // No credentials: let the rest of the chain decide
        assert!(matches!(authenticate(None), AuthnResponse::Continue));
        assert!(matches!(authenticate(Some("  ")), AuthnResponse::Continue));

        assert!(matches!(
            authenticate(Some("Basic YWxpY2U6cGFzcw==")),
            AuthnResponse::Unauthenticated
        ));
        assert!(matches!(
            authenticate(Some("Bearer")),
            AuthnResponse::Unauthenticated
        ));
        assert!(matches!(
            authenticate(Some("Bearer not-a-jwt")),
            AuthnResponse::Unauthenticated
        ));
    }
}
