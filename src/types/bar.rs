use serde::{Deserialize, Serialize};

/// The only resource served by the API.
///
/// An `id` of `0` (also the value of a missing `id` field) means "not assigned
/// yet": on creation the persistence backend picks the identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(default)]
    pub id: i64,
}

impl Bar {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}
