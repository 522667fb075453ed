use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hint::prompt::build_prompt;
use crate::hint::{HintError, HintProvider};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEMPERATURE: f32 = 0.7;

/// Hint provider backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiHintProvider {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiHintProvider {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, HintError> {
        if api_key.trim().is_empty() {
            return Err(HintError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

impl HintProvider for GeminiHintProvider {
    fn fetch_hint(&self, challenge: &str) -> Result<String, HintError> {
        let prompt = build_prompt(challenge);
        let body = GenerateRequest {
            system_instruction: prompt.system_instruction.map(Content::text),
            contents: vec![Content::text(&prompt.text)],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    HintError::Offline
                } else {
                    HintError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HintError::Status(status.as_u16()));
        }
        let parsed: GenerateResponse = response.json()?;
        parsed.first_text().ok_or(HintError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            system_instruction: Some(Content::text("sys")),
            contents: vec![Content::text("hello")],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            json["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            0
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Dah "},{"text":"dit."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("Dah dit."));
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.first_text(), None);
    }

    #[test]
    fn test_blank_key_rejected() {
        let result = GeminiHintProvider::new(
            "  ".to_string(),
            "gemini-2.5-flash".to_string(),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(HintError::MissingApiKey)));
    }
}
