use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::claim::{Claim, PERMISSION_CLAIM, READ_PERMISSION, WRITE_PERMISSION};

use super::{AuthzError, AuthzRequest, AuthzResponse, Authorizer};

pub const GET_POLICY: &str = "GetPolicy";
pub const POST_POLICY: &str = "PostPolicy";

/// Configured form of a policy: callers need a claim of `claim_type` whose
/// value is one of `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    pub name: String,
    pub claim_type: String,
    pub values: Vec<String>,
}

impl PolicyRule {
    pub fn new(name: &str, claim_type: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            claim_type: claim_type.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn defaults() -> Vec<PolicyRule> {
        vec![
            Self::new(GET_POLICY, PERMISSION_CLAIM, &[READ_PERMISSION]),
            Self::new(POST_POLICY, PERMISSION_CLAIM, &[WRITE_PERMISSION]),
        ]
    }
}

#[derive(Debug)]
struct Policy {
    claim_type: String,
    values: HashSet<String>,
}

impl Policy {
    /// Exact, case-sensitive match on both claim type and value.
    fn is_satisfied_by(&self, claims: &[Claim]) -> bool {
        claims
            .iter()
            .any(|claim| claim.claim_type == self.claim_type && self.values.contains(&claim.value))
    }
}

/// Immutable table of named policies, built once at startup.
#[derive(Debug)]
pub struct PolicySet {
    policies: HashMap<String, Policy>,
}

impl PolicySet {
    pub fn new(rules: &[PolicyRule]) -> Result<Self, AuthzError> {
        let mut policies = HashMap::with_capacity(rules.len());
        for rule in rules {
            let policy = Policy {
                claim_type: rule.claim_type.clone(),
                values: rule.values.iter().cloned().collect(),
            };
            if policies.insert(rule.name.clone(), policy).is_some() {
                return Err(AuthzError::DuplicatePolicy(rule.name.clone()));
            }
        }
        Ok(Self { policies })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Returns whether `claims` satisfy the policy called `name`.
    pub fn evaluate(&self, name: &str, claims: &[Claim]) -> Result<bool, AuthzError> {
        match self.policies.get(name) {
            Some(policy) => Ok(policy.is_satisfied_by(claims)),
            None => Err(AuthzError::UnknownPolicy(name.to_string())),
        }
    }
}

pub struct PolicyAuthorizer {
    policies: Arc<PolicySet>,
}

impl PolicyAuthorizer {
    pub fn new(policies: Arc<PolicySet>) -> Self {
        Self { policies }
    }
}

impl Authorizer for PolicyAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse, AuthzError> {
        if self.policies.evaluate(&req.policy, &req.principal.claims)? {
            return Ok(AuthzResponse::Ok);
        }

        Ok(AuthzResponse::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::authn::Principal;

    fn default_set() -> PolicySet {
        PolicySet::new(&PolicyRule::defaults()).unwrap()
    }

    #[test]
    fn test_evaluate() {
        let set = default_set();

        let read = vec![Claim::permission("Read")];
        let write = vec![Claim::permission("Write")];
        let both = vec![Claim::permission("Write"), Claim::permission("Read")];

        assert!(set.evaluate(GET_POLICY, &read).unwrap());
        assert!(!set.evaluate(POST_POLICY, &read).unwrap());

        assert!(set.evaluate(POST_POLICY, &write).unwrap());
        assert!(!set.evaluate(GET_POLICY, &write).unwrap());

        assert!(set.evaluate(GET_POLICY, &both).unwrap());
        assert!(set.evaluate(POST_POLICY, &both).unwrap());

        // No claims at all, as for an anonymous caller
        assert!(!set.evaluate(GET_POLICY, &[]).unwrap());
        assert!(!set.evaluate(POST_POLICY, &[]).unwrap());
    }

    #[test]
    fn test_evaluate_exact_match() {
        let set = default_set();

        let cases = [
            Claim::permission("NonReadClaim"),
            Claim::permission("read"),
            Claim::permission("READ"),
            Claim::permission(" Read"),
            Claim::new("permission", "Read"),
            Claim::new("Role", "Read"),
            Claim::new("Name", "HttpAPITesting"),
        ];
        for claim in cases {
            assert!(
                !set.evaluate(GET_POLICY, &[claim.clone()]).unwrap(),
                "{claim:?} should not satisfy {GET_POLICY}"
            );
        }

        // One matching claim among unrelated ones is enough
        let claims = vec![
            Claim::new("Name", "HttpAPITesting"),
            Claim::permission("NonReadClaim"),
            Claim::permission("Read"),
        ];
        assert!(set.evaluate(GET_POLICY, &claims).unwrap());
    }

    #[test]
    fn test_accepted_value_set() {
        let rules = vec![PolicyRule::new(
            GET_POLICY,
            PERMISSION_CLAIM,
            &["Read", "Admin"],
        )];
        let set = PolicySet::new(&rules).unwrap();

        assert!(set.evaluate(GET_POLICY, &[Claim::permission("Admin")]).unwrap());
        assert!(set.evaluate(GET_POLICY, &[Claim::permission("Read")]).unwrap());
        assert!(!set.evaluate(GET_POLICY, &[Claim::permission("Write")]).unwrap());
    }

    #[test]
    fn test_unknown_and_duplicate_policy() {
        let set = default_set();
        assert!(set.contains(GET_POLICY));
        assert!(!set.contains("DeletePolicy"));
        assert_eq!(
            set.evaluate("DeletePolicy", &[Claim::permission("Read")]),
            Err(AuthzError::UnknownPolicy(String::from("DeletePolicy")))
        );

        let mut rules = PolicyRule::defaults();
        rules.push(PolicyRule::new(GET_POLICY, PERMISSION_CLAIM, &["Write"]));
        assert_eq!(
            PolicySet::new(&rules).unwrap_err(),
            AuthzError::DuplicatePolicy(String::from(GET_POLICY))
        );
    }

    #[test]
    fn test_policy_authorizer() {
        let authz = PolicyAuthorizer::new(Arc::new(default_set()));

        let req = AuthzRequest {
            policy: GET_POLICY.to_string(),
            principal: Principal::new("reader", vec![Claim::permission("Read")]),
        };
        assert_eq!(authz.authorize_request(&req).unwrap(), AuthzResponse::Ok);

        let req = AuthzRequest {
            policy: POST_POLICY.to_string(),
            principal: Principal::new("reader", vec![Claim::permission("Read")]),
        };
        assert_eq!(
            authz.authorize_request(&req).unwrap(),
            AuthzResponse::Forbidden
        );

        let req = AuthzRequest {
            policy: GET_POLICY.to_string(),
            principal: Principal::anonymous(),
        };
        assert_eq!(
            authz.authorize_request(&req).unwrap(),
            AuthzResponse::Forbidden
        );

        let req = AuthzRequest {
            policy: String::from("Unknown"),
            principal: Principal::new("reader", vec![Claim::permission("Read")]),
        };
        assert!(authz.authorize_request(&req).is_err());
    }
}
