use std::{fs, io};

use anyhow::{bail, Context, Result};
use log::info;

use crate::rsa::generate_rsa_keys;

use super::config::TokenConfig;
use super::jwt::{JwtTokenGenerator, JwtTokenValidator};

pub struct TokenFactory {
    public_key: Vec<u8>,
    private_key: Vec<u8>,
    expiry: u64,
}

impl TokenFactory {
    pub fn new(cfg: &TokenConfig) -> Result<Self> {
        let (public_key, private_key) = match fs::read(&cfg.public_key_path) {
            Ok(data) => (data, None),
            Err(err) if err.kind() == io::ErrorKind::NotFound && cfg.generate_if_not_exists => {
                info!("Public key and private key for token not found, generating with rsa");
                let (public_key, private_key) = generate_rsa_keys()?;
                fs::write(&cfg.public_key_path, &public_key)
                    .context("write token public key")?;
                fs::write(&cfg.private_key_path, &private_key)
                    .context("write token private key")?;
                (public_key, Some(private_key))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                bail!("token public key not found: {}", cfg.public_key_path)
            }
            Err(err) => return Err(err).context("read token public key failed"),
        };

        let private_key = match private_key {
            Some(key) => key,
            None => fs::read(&cfg.private_key_path).context("read token private key failed")?,
        };

        Ok(Self {
            public_key,
            private_key,
            expiry: cfg.expiry,
        })
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        let (public_key, private_key) = &*super::testing::TEST_KEYS;
        Self {
            public_key: public_key.clone(),
            private_key: private_key.clone(),
            expiry: TokenConfig::default_expiry(),
        }
    }

    pub fn build_token_generator(&self) -> Result<JwtTokenGenerator> {
        JwtTokenGenerator::new(&self.private_key, self.expiry)
    }

    pub fn build_token_validator(&self) -> Result<JwtTokenValidator> {
        JwtTokenValidator::new(&self.public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CommonConfig, PathSet};
    use crate::server::authn::token::{TokenGenerator, TokenValidator};

    #[test]
    fn test_generate_keys() {
        let ps = PathSet::new_test("token_factory");
        let mut cfg = TokenConfig::default();
        cfg.complete(&ps).unwrap();

        let factory = TokenFactory::new(&cfg).unwrap();
        assert!(ps.pki_path.join("token_public.pem").exists());
        assert!(ps.pki_path.join("token_private.pem").exists());

        // Second build must reuse the keys written by the first one
        let again = TokenFactory::new(&cfg).unwrap();
        let token = factory
            .build_token_generator()
            .unwrap()
            .generate_token(String::from("alice"), vec![])
            .unwrap();
        let principal = again
            .build_token_validator()
            .unwrap()
            .validate_token(&token.token)
            .unwrap();
        assert_eq!(principal.name, "alice");

        let mut cfg = TokenConfig::default();
        cfg.public_key_path = format!("{}", ps.pki_path.join("absent.pem").display());
        cfg.private_key_path = format!("{}", ps.pki_path.join("absent.key").display());
        cfg.complete(&ps).unwrap();
        assert!(TokenFactory::new(&cfg).is_err());
    }
}
