pub mod config;
pub mod factory;
pub mod jwt;

use anyhow::Result;

use crate::types::claim::Claim;
use crate::types::token::TokenResponse;

use super::Principal;

pub trait TokenGenerator {
    fn generate_token(&self, subject: String, claims: Vec<Claim>) -> Result<TokenResponse>;
}

pub trait TokenValidator {
    fn validate_token(&self, token: &str) -> Result<Principal>;
}

#[cfg(test)]
pub mod testing {
    use once_cell::sync::Lazy;

    use crate::rsa::generate_rsa_keys;

    /// `(public_key, private_key)` shared by every test in the binary; RSA
    /// generation is too slow to repeat per test.
    pub static TEST_KEYS: Lazy<(Vec<u8>, Vec<u8>)> =
        Lazy::new(|| generate_rsa_keys().expect("generate test rsa keys"));
}
