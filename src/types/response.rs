use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Envelope of every error response, and of successes that carry no data.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommonResponse {
    /// Mirrors the HTTP status code.
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Envelope of responses carrying a resource, such as a [`Bar`](super::bar::Bar).
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct ResourceResponse<T: Serialize + DeserializeOwned> {
    pub code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub data: Option<T>,
}
