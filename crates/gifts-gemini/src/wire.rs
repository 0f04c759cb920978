//! Request and response bodies for `models/{model}:generateContent`.

use gifts_core::category::Category;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A single content part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    /// Text payload; absent for non-text parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A turn in the conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// `user` on requests, `model` on responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The parts making up the turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Structured-output settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Always `application/json`.
    pub response_mime_type: &'static str,
    /// OpenAPI-style schema the output must follow.
    pub response_schema: Value,
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The prompt.
    pub contents: Vec<Content>,
    /// Structured-output settings.
    pub generation_config: GenerationConfig,
}

/// A generated candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Content,
}

/// Response envelope of a `generateContent` call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates, best first.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate's first text part.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|part| part.text.as_deref())
    }
}

/// Prompt sent for `category`.
#[must_use]
pub fn prompt(category: Category) -> String {
    format!("Analyze the spiritual gift of {category}. Provide a deep dive analysis.")
}

/// Schema requiring the four narrative fields.
#[must_use]
pub fn narrative_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A deep dive summary of what this gift looks like in maturity."
            },
            "biblicalRoleModels": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 Biblical characters who exemplified this gift."
            },
            "potentialPitfalls": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 common weaknesses or temptations associated with this gift."
            },
            "growthPlan": {
                "type": "STRING",
                "description": "A specific actionable plan to develop this gift over the next week."
            }
        },
        "required": ["summary", "biblicalRoleModels", "potentialPitfalls", "growthPlan"]
    })
}

impl GenerateContentRequest {
    /// The narrative request for `category`.
    #[must_use]
    pub fn for_category(category: Category) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![Part {
                    text: Some(prompt(category)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: narrative_schema(),
            },
        }
    }
}
