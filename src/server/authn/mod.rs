mod anonymous;
mod bearer_token;
mod union;

pub mod chain;
pub mod config;
pub mod factory;
pub mod token;

use actix_web::HttpRequest;
use anyhow::Result;

use crate::types::claim::Claim;

pub trait Authenticator: Send + Sync {
    /// Inspects the request and either resolves the caller, defers to the next
    /// authenticator, or rejects the request outright.
    ///
    /// `principal` carries the caller resolved by earlier authenticators in a
    /// chain, if any.
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        principal: Option<Principal>,
    ) -> Result<AuthnResponse>;
}

#[derive(Debug, Clone)]
pub enum AuthnResponse {
    Ok(Principal),
    Continue,
    Unauthenticated,
}

/// The caller behind a request, as far as the API cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
    pub claims: Vec<Claim>,
    pub is_anonymous: bool,
}

impl Principal {
    pub fn new(name: impl Into<String>, claims: Vec<Claim>) -> Self {
        Self {
            name: name.into(),
            claims,
            is_anonymous: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            name: String::new(),
            claims: vec![],
            is_anonymous: true,
        }
    }

    /// Name used in logs.
    pub fn display_name(&self) -> &str {
        if self.is_anonymous || self.name.is_empty() {
            return "<anonymous>";
        }
        &self.name
    }
}
