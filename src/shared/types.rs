use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire shape for every error response.
///
/// `error_key` is a stable machine-readable key; `messages` is an optional
/// localized message map keyed by language code. The dialog picks a message
/// for the reporter's exact interface language or falls back to its own
/// generic copy.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[serde(rename = "errorKey")]
    pub error_key: String,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub messages: HashMap<String, String>,
}
