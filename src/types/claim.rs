use serde::{Deserialize, Serialize};

/// Claim type carried by every permission granted to a caller.
pub const PERMISSION_CLAIM: &str = "Permission";

pub const READ_PERMISSION: &str = "Read";
pub const WRITE_PERMISSION: &str = "Write";

/// A (type, value) fact about an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }

    pub fn permission(value: impl Into<String>) -> Self {
        Self::new(PERMISSION_CLAIM, value)
    }
}
