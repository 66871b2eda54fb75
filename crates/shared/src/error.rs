use serde::{Deserialize, Serialize};

/// Error body returned by the catalog proxy: `{"error": "..."}`.
///
/// The text is diagnostic only. Clients log it and never show it to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
