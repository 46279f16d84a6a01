mod policy;

pub mod config;
pub mod factory;

use thiserror::Error;

pub use policy::{PolicyAuthorizer, PolicyRule, PolicySet, GET_POLICY, POST_POLICY};

use super::authn::Principal;

pub trait Authorizer: Send + Sync {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse, AuthzError>;
}

#[derive(Debug, Clone)]
pub struct AuthzRequest {
    /// Name of the policy guarding the requested operation.
    pub policy: String,
    pub principal: Principal,
}

/// Possible outcomes of an authorization check.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthzResponse {
    /// Access is granted
    Ok,
    /// The caller's claims do not satisfy the policy
    Forbidden,
}

/// Authorization misconfiguration. Never a property of the caller: these
/// indicate the server was built with a broken policy table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unknown authorization policy '{0}'")]
    UnknownPolicy(String),

    #[error("authorization policy '{0}' is defined more than once")]
    DuplicatePolicy(String),
}
