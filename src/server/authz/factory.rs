use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use super::config::AuthzConfig;
use super::policy::{PolicyAuthorizer, PolicySet};

pub struct AuthzFactory;

impl AuthzFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_policies(&self, cfg: &AuthzConfig) -> Result<Arc<PolicySet>> {
        for policy in cfg.policies.iter() {
            info!(
                "Register policy '{}': requires claim '{}' in {:?}",
                policy.name, policy.claim_type, policy.values
            );
        }
        let policies = PolicySet::new(&cfg.policies).context("build policy set")?;
        Ok(Arc::new(policies))
    }

    pub fn build_authorizer(&self, policies: Arc<PolicySet>) -> PolicyAuthorizer {
        PolicyAuthorizer::new(policies)
    }
}
