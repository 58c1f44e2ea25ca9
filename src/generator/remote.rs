use std::time::Duration;

use serde_json::{Value, json};

use crate::generator::catalog;
use crate::generator::{ContentError, ContentSource};
use crate::model::item::ReturnItem;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variables checked, in order, for the content source key.
pub const CREDENTIAL_VARS: &[&str] = &["RETURNSLEUTH_API_KEY", "GEMINI_API_KEY", "API_KEY"];

pub fn credential_from_env() -> Option<String> {
    CREDENTIAL_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Generative content source backed by the Gemini `generateContent` API.
pub struct GeminiSource {
    api_key: String,
    model: String,
    endpoint: String,
    request_timeout: Duration,
}

impl GeminiSource {
    pub fn new(api_key: String, model: &str, endpoint: &str, request_timeout: Duration) -> Self {
        Self {
            api_key,
            model: model.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            request_timeout,
        }
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }

    #[cfg(feature = "network")]
    fn post(&self, body: &Value) -> Result<Value, ContentError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ContentError::Http(e.to_string()))?;
        let response = client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .map_err(|e| ContentError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status(status.as_u16()));
        }
        response
            .json::<Value>()
            .map_err(|e| ContentError::Malformed(e.to_string()))
    }

    #[cfg(not(feature = "network"))]
    fn post(&self, _body: &Value) -> Result<Value, ContentError> {
        Err(ContentError::Disabled)
    }
}

impl ContentSource for GeminiSource {
    fn fetch(&self, level: u32, count: usize) -> Result<Vec<ReturnItem>, ContentError> {
        if self.api_key.is_empty() {
            return Err(ContentError::MissingCredential);
        }
        let body = request_body(level, count);
        let response = self.post(&body)?;
        let text = response_text(&response)
            .ok_or_else(|| ContentError::Malformed("response has no text part".to_string()))?;
        crate::generator::parse::parse_batch(&text)
    }
}

pub fn prompt(level: u32, count: usize) -> String {
    let names = catalog::template_names()
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Generate {count} e-commerce return items for inspection level {level}. \
         Pick each name strictly from: {names}. \
         Fields: itemType (clothing_top/clothing_dress/shoe/electronics/bag), material, description, \
         visualDefects (stain/tear/broken_tag/missing_component/broken_seal/none), isFraud (bool), \
         color (hex), explanation. \
         isFraud must be true exactly when visualDefects contains anything other than none; \
         a clean item has visualDefects [\"none\"]. Mix good and bad items. Respond with a JSON array."
    )
}

pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "category": { "type": "STRING", "enum": ["female", "male"] },
                "itemType": {
                    "type": "STRING",
                    "enum": ["clothing_top", "clothing_dress", "shoe", "electronics", "bag"]
                },
                "material": { "type": "STRING" },
                "description": { "type": "STRING" },
                "visualDefects": {
                    "type": "ARRAY",
                    "items": {
                        "type": "STRING",
                        "enum": ["stain", "tear", "broken_tag", "missing_component", "broken_seal", "none"]
                    }
                },
                "isFraud": { "type": "BOOLEAN" },
                "color": { "type": "STRING" },
                "explanation": { "type": "STRING" }
            },
            "required": [
                "name", "category", "itemType", "material", "description",
                "visualDefects", "isFraud", "color", "explanation"
            ]
        }
    })
}

pub fn request_body(level: u32, count: usize) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt(level, count) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema(),
            "temperature": 0.9
        }
    })
}

/// Concatenated text parts of the first candidate.
pub fn response_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_states_fraud_rule_and_count() {
        let p = prompt(3, 5);
        assert!(p.contains("Generate 5"));
        assert!(p.contains("level 3"));
        assert!(p.contains("isFraud must be true exactly when"));
        assert!(p.contains("\"Laptop\""));
    }

    #[test]
    fn schema_restricts_enums() {
        let schema = response_schema();
        let props = &schema["items"]["properties"];
        assert_eq!(props["category"]["enum"].as_array().unwrap().len(), 2);
        assert_eq!(props["itemType"]["enum"].as_array().unwrap().len(), 5);
        assert_eq!(props["visualDefects"]["items"]["enum"].as_array().unwrap().len(), 6);
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn request_body_carries_generation_config() {
        let body = request_body(1, 5);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["temperature"], 0.9);
    }

    #[test]
    fn response_text_joins_parts() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "[1," }, { "text": "2]" }] } }]
        });
        assert_eq!(response_text(&response).as_deref(), Some("[1,2]"));
        assert_eq!(response_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn empty_key_is_missing_credential() {
        let source = GeminiSource::new(
            String::new(),
            DEFAULT_MODEL,
            DEFAULT_ENDPOINT,
            Duration::from_secs(1),
        );
        assert!(matches!(source.fetch(1, 5), Err(ContentError::MissingCredential)));
    }

    #[test]
    fn url_targets_model() {
        let source = GeminiSource::new("k".into(), "m", "https://host/v1/models/", Duration::from_secs(1));
        assert_eq!(source.url(), "https://host/v1/models/m:generateContent");
    }
}
