//! Wire payloads exchanged with the answer service.

use serde::Serialize;
use serde_json::Value;

use crate::core::constants::NO_RESPONSE_FALLBACK;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AskRequest {
    pub prompt: String,
}

/// A decoded answer with the fallbacks already applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

impl Answer {
    /// Build an answer from any JSON body.
    ///
    /// Missing or empty `response` becomes [`NO_RESPONSE_FALLBACK`], missing
    /// `sources` becomes an empty list. Bodies that are not objects decode to
    /// those same defaults. Extra fields such as `rag_used` are ignored.
    pub fn from_value(value: &Value) -> Self {
        let text = value
            .get("response")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_RESPONSE_FALLBACK)
            .to_string();

        let sources = value
            .get("sources")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(source_label).collect())
            .unwrap_or_default();

        Self { text, sources }
    }
}

fn source_label(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
