use std::collections::HashSet;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

use super::policy::{PolicyRule, GET_POLICY, POST_POLICY};

/// Authorization related configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthzConfig {
    /// Named policies checked before each operation. Both `GetPolicy` and
    /// `PostPolicy` must be present; by default they require the `Permission`
    /// claim with value `Read` and `Write` respectively.
    #[serde(default = "AuthzConfig::default_policies")]
    pub policies: Vec<PolicyRule>,
}

impl CommonConfig for AuthzConfig {
    fn default() -> Self {
        Self {
            policies: Self::default_policies(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        let mut names = HashSet::new();
        for policy in self.policies.iter() {
            if policy.name.is_empty() {
                bail!("policy name cannot be empty");
            }
            if policy.claim_type.is_empty() {
                bail!("claim_type of policy '{}' cannot be empty", policy.name);
            }
            if policy.values.is_empty() || policy.values.iter().any(|v| v.is_empty()) {
                bail!("values of policy '{}' cannot be empty", policy.name);
            }
            if !names.insert(policy.name.as_str()) {
                bail!("policy '{}' is defined more than once", policy.name);
            }
        }

        for required in [GET_POLICY, POST_POLICY] {
            if !names.contains(required) {
                bail!("policy '{required}' is required");
            }
        }

        Ok(())
    }
}

impl AuthzConfig {
    pub fn default_policies() -> Vec<PolicyRule> {
        PolicyRule::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(toml_str: &str) -> Result<AuthzConfig> {
        let ps = PathSet::new_test("authz_config");
        let mut cfg: AuthzConfig = toml::from_str(toml_str)?;
        cfg.complete(&ps)?;
        Ok(cfg)
    }

    #[test]
    fn test_complete() {
        let cfg = complete("").unwrap();
        assert_eq!(cfg.policies, PolicyRule::defaults());

        let cfg = complete(
            r#"
[[policies]]
name = "GetPolicy"
claim_type = "Permission"
values = ["Read", "Audit"]

[[policies]]
name = "PostPolicy"
claim_type = "Permission"
values = ["Write"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.policies[0].values, vec!["Read", "Audit"]);

        // PostPolicy missing
        assert!(complete(
            r#"
[[policies]]
name = "GetPolicy"
claim_type = "Permission"
values = ["Read"]
"#
        )
        .is_err());

        // Empty values
        assert!(complete(
            r#"
[[policies]]
name = "GetPolicy"
claim_type = "Permission"
values = []

[[policies]]
name = "PostPolicy"
claim_type = "Permission"
values = ["Write"]
"#
        )
        .is_err());

        // Duplicate
        assert!(complete(
            r#"
[[policies]]
name = "GetPolicy"
claim_type = "Permission"
values = ["Read"]

[[policies]]
name = "GetPolicy"
claim_type = "Permission"
values = ["Write"]

[[policies]]
name = "PostPolicy"
claim_type = "Permission"
values = ["Write"]
"#
        )
        .is_err());

        // Empty claim type
        assert!(complete(
            r#"
[[policies]]
name = "GetPolicy"
claim_type = ""
values = ["Read"]

[[policies]]
name = "PostPolicy"
claim_type = "Permission"
values = ["Write"]
"#
        )
        .is_err());
    }
}
