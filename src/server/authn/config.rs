use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

use super::token::config::TokenConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthnConfig {
    /// Treat requests without credentials as an anonymous caller holding no
    /// claims instead of rejecting them with 401. Defaults to false.
    #[serde(default = "AuthnConfig::default_allow_anonymous")]
    pub allow_anonymous: bool,

    #[serde(default = "TokenConfig::default")]
    pub token: TokenConfig,
}

impl CommonConfig for AuthnConfig {
    fn default() -> Self {
        Self {
            allow_anonymous: Self::default_allow_anonymous(),
            token: TokenConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.token.complete(ps).context("token")?;
        Ok(())
    }
}

impl AuthnConfig {
    pub fn default_allow_anonymous() -> bool {
        false
    }
}
