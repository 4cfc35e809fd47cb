//! Gemini `generateContent` client for voice commands.
//!
//! One request per voice command; no retry and no explicit timeout beyond the HTTP client
//! defaults. A failed call fails the whole command.

use super::{build_voice_command_prompt, FlowRequest, FlowResponse, VoiceCommandFlow};
use crate::config::GeminiConfig;
use crate::{CoreError, CoreResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// [`VoiceCommandFlow`] backed by the hosted Gemini API.
#[derive(Clone, Debug)]
pub struct GeminiFlow {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiFlow {
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn request_body(req: &FlowRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: build_voice_command_prompt(req),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.2,
            },
        }
    }

    fn extract(response: GenerateContentResponse) -> CoreResult<FlowResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Flow("model returned no candidates".into()))?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();

        FlowResponse::parse_model_text(&text)
    }
}

#[async_trait]
impl VoiceCommandFlow for GeminiFlow {
    async fn run(&self, req: &FlowRequest) -> CoreResult<FlowResponse> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| CoreError::Config("GEMINI_API_KEY is not configured".into()))?;

        let response = self
            .client
            .post(self.config.generate_content_url())
            .header(API_KEY_HEADER, api_key)
            .json(&Self::request_body(req))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Flow(format!(
                "Gemini returned {status}: {}",
                body.chars().take(512).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Self::extract(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::gemini_config_from_env_values;
    use serde_json::json;

    fn flow_request() -> FlowRequest {
        FlowRequest {
            voice_input: "temperature thirty eight point four".into(),
            context: "{}".into(),
            patient_id: None,
        }
    }

    #[test]
    fn request_body_asks_for_json() {
        let body = serde_json::to_value(GeminiFlow::request_body(&flow_request())).expect("json");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["contents"][0]["role"], "user");
        let text = body["contents"][0]["parts"][0]["text"]
            .as_str()
            .expect("prompt text");
        assert!(text.contains("temperature thirty eight point four"));
    }

    #[test]
    fn extract_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"role": "model", "parts": [
                    {"text": "{\"updatedFields\": {\"patient.temperature\": 38.4},"},
                    {"text": " \"actionTaken\": \"Recorded temperature\"}"}
                ]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .expect("response shape");

        let flow = GeminiFlow::extract(response).expect("extract");
        assert_eq!(flow.updated_fields.get("patient.temperature"), Some(&json!(38.4)));
        assert_eq!(flow.action_taken, "Recorded temperature");
    }

    #[test]
    fn extract_without_candidates_is_an_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}}))
                .expect("response shape");
        let err = GeminiFlow::extract(response).expect_err("no candidates");
        assert!(matches!(err, CoreError::Flow(_)));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let cfg = gemini_config_from_env_values(None, None, Some("http://127.0.0.1:9".into()))
            .expect("config");
        let err = GeminiFlow::new(cfg)
            .run(&flow_request())
            .await
            .expect_err("no key");
        assert!(matches!(err, CoreError::Config(_)));
    }
}
