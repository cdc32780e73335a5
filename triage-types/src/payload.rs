//! Parsed representation of provider responses.

use serde::{Deserialize, Serialize};

/// A provider response after shape detection.
///
/// Providers are asked for JSON-shaped documents but regularly return prose;
/// callers need to know which they got. The degraded form is an explicit
/// variant, constructed by [`from_provider_text`](Self::from_provider_text),
/// never a mutated default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationPayload {
    /// The response parsed as a JSON object; fields preserved verbatim.
    Structured {
        /// Top-level fields of the parsed object.
        fields: serde_json::Map<String, serde_json::Value>,
    },
    /// The response did not parse as a JSON object; raw text preserved.
    Unstructured {
        /// The provider's text, untouched.
        text: String,
    },
}

impl GenerationPayload {
    /// Classify raw provider text.
    ///
    /// Only a top-level JSON object counts as structured; arrays, scalars,
    /// and malformed JSON all degrade to [`Unstructured`](Self::Unstructured).
    #[must_use]
    pub fn from_provider_text(text: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(text.trim()) {
            Ok(serde_json::Value::Object(fields)) => Self::Structured { fields },
            _ => Self::Unstructured {
                text: text.to_string(),
            },
        }
    }

    /// True when the response parsed as a JSON object.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }
}
