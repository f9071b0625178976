use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mobile API response body: a message plus a status code.
///
/// Used for both success and error responses so clients can read
/// `code` without inspecting the HTTP status line.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Human readable (localized) message
    #[schema(example = "Operation succeeded.")]
    pub msg: String,
    /// Status code of the outcome
    #[schema(example = 204)]
    pub code: u16,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>, code: u16) -> Self {
        Self {
            msg: msg.into(),
            code,
        }
    }
}
