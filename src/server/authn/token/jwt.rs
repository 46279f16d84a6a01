use anyhow::{bail, Result};
use chrono::Local;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::server::authn::Principal;
use crate::types::claim::Claim;

use super::{TokenGenerator, TokenResponse, TokenValidator};

/// JWT issuer identifier
const ISSUER: &str = "fooapi/jwt-tokenizer";

/// Registered JWT claims (RFC 7519) plus the caller's permission claims.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>, // Optional. The intended recipient of the token
    pub exp: usize,          // Required. Token expiration time (timestamp)
    pub iat: usize,          // Optional. Time at which token was issued (timestamp)
    pub iss: String,         // Optional. Token issuer
    pub nbf: usize,          // Optional. Time before which token must not be accepted (timestamp)
    pub sub: String,         // Optional. Subject of the token (user identifier)

    #[serde(default)]
    pub claims: Vec<Claim>,
}

pub struct JwtTokenGenerator {
    key: EncodingKey, // Private key for signing
    expiry: usize,
}

impl JwtTokenGenerator {
    pub fn new(private_key: &[u8], expiry: u64) -> Result<Self> {
        let key = match EncodingKey::from_rsa_pem(private_key) {
            Ok(key) => key,
            Err(e) => bail!("parse RSA private key for jwt token generation failed: {e}"),
        };
        Ok(Self {
            key,
            expiry: expiry as usize,
        })
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String> {
        match encode(&Header::new(Algorithm::RS256), claims, &self.key) {
            Ok(token) => Ok(token),
            Err(e) => bail!("generate jwt token failed: {e}"),
        }
    }
}

impl TokenGenerator for JwtTokenGenerator {
    fn generate_token(&self, subject: String, claims: Vec<Claim>) -> Result<TokenResponse> {
        if subject.is_empty() {
            bail!("token subject should not be empty");
        }

        let now = Local::now().timestamp() as usize;
        let claims = TokenClaims {
            aud: None,
            exp: now + self.expiry,
            iat: now,
            iss: String::from(ISSUER),
            nbf: now,
            sub: subject,
            claims,
        };

        let token = self.sign(&claims)?;
        Ok(TokenResponse {
            subject: claims.sub,
            token,
            expire_in: claims.exp,
        })
    }
}

pub struct JwtTokenValidator {
    key: DecodingKey,
}

impl JwtTokenValidator {
    pub fn new(public_key: &[u8]) -> Result<Self> {
        let key = match DecodingKey::from_rsa_pem(public_key) {
            Ok(key) => key,
            Err(e) => bail!("parse RSA public key for jwt token validation failed: {e}"),
        };
        Ok(Self { key })
    }
}

impl TokenValidator for JwtTokenValidator {
    fn validate_token(&self, token: &str) -> Result<Principal> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "nbf", "sub"]);

        let claims = match decode::<TokenClaims>(token, &self.key, &validation) {
            Ok(data) => data.claims,
            Err(e) => bail!("validate jwt token failed: {e}"),
        };

        if claims.sub.is_empty() {
            bail!("validate jwt token failed: empty subject");
        }

        // jsonwebtoken allows some leeway on exp, we do not
        let now = Local::now().timestamp() as usize;
        if now >= claims.exp {
            bail!("validate jwt token failed: token expired");
        }

        if now < claims.nbf {
            bail!("validate jwt token failed: token not yet valid");
        }

        Ok(Principal::new(claims.sub, claims.claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::authn::token::testing::TEST_KEYS;

    fn build() -> (JwtTokenGenerator, JwtTokenValidator) {
        let (public_key, private_key) = &*TEST_KEYS;
        let generator = JwtTokenGenerator::new(private_key, 60).unwrap();
        let validator = JwtTokenValidator::new(public_key).unwrap();
        (generator, validator)
    }

    #[test]
    fn test_jwt_token() {
        let (generator, validator) = build();

        let cases = [
            ("Alice", vec![Claim::permission("Read")]),
            ("Bob", vec![Claim::permission("Write")]),
            (
                "Carol",
                vec![Claim::permission("Read"), Claim::permission("Write")],
            ),
            ("HttpAPITesting", vec![Claim::new("Name", "HttpAPITesting")]),
            ("David", vec![]),
        ];
        for (subject, claims) in cases {
            let token = generator
                .generate_token(subject.to_string(), claims.clone())
                .unwrap();
            assert_eq!(token.subject, subject);

            let principal = validator.validate_token(&token.token).unwrap();
            assert_eq!(principal.name, subject);
            assert_eq!(principal.claims, claims);
            assert!(!principal.is_anonymous);
        }

        assert!(generator.generate_token(String::new(), vec![]).is_err());
        assert!(validator.validate_token("").is_err());
        assert!(validator.validate_token("a.b.c").is_err());
    }

    #[test]
    fn test_jwt_token_expired() {
        let (generator, validator) = build();

        let now = Local::now().timestamp() as usize;
        let token = generator
            .sign(&TokenClaims {
                aud: None,
                exp: now - 5,
                iat: now - 65,
                iss: String::from(ISSUER),
                nbf: now - 65,
                sub: String::from("Alice"),
                claims: vec![Claim::permission("Read")],
            })
            .unwrap();
        assert!(validator.validate_token(&token).is_err());
    }

    #[test]
    fn test_jwt_token_wrong_issuer() {
        let (generator, validator) = build();

        let now = Local::now().timestamp() as usize;
        let token = generator
            .sign(&TokenClaims {
                aud: None,
                exp: now + 60,
                iat: now,
                iss: String::from("someone-else"),
                nbf: now,
                sub: String::from("Alice"),
                claims: vec![],
            })
            .unwrap();
        assert!(validator.validate_token(&token).is_err());
    }

    #[test]
    fn test_jwt_token_foreign_key() {
        let (generator, _) = build();
        let (other_public, _) = crate::rsa::generate_rsa_keys().unwrap();
        let validator = JwtTokenValidator::new(&other_public).unwrap();

        let token = generator
            .generate_token(String::from("Alice"), vec![])
            .unwrap();
        assert!(validator.validate_token(&token.token).is_err());
    }
}
