//! AI flow boundary.
//!
//! The flow receives a voice command with its patient context and reports which record fields it
//! believes should change (`updatedFields`) plus a short label of what it did (`actionTaken`).
//! The dispatcher treats the flow as an opaque capability behind [`VoiceCommandFlow`].

mod gemini;
mod prompt;

pub use gemini::GeminiFlow;
pub use prompt::build_voice_command_prompt;

use crate::{CoreError, CoreResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input to a voice-command flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRequest {
    pub voice_input: String,
    /// Patient context serialised as JSON.
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
}

/// Output of a voice-command flow.
///
/// Both fields default to empty when the flow omits them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowResponse {
    #[serde(default)]
    pub updated_fields: Map<String, Value>,
    #[serde(default)]
    pub action_taken: String,
}

impl FlowResponse {
    /// Parse the model's text output, tolerating a surrounding markdown code fence.
    pub fn parse_model_text(text: &str) -> CoreResult<Self> {
        let cleaned = strip_code_fence(text);
        if cleaned.is_empty() {
            return Err(CoreError::Flow("model returned an empty response".into()));
        }
        serde_json::from_str(cleaned)
            .map_err(|e| CoreError::Flow(format!("model response is not valid flow JSON: {e}")))
    }
}

/// A capability that interprets a voice command.
#[async_trait]
pub trait VoiceCommandFlow: Send + Sync {
    async fn run(&self, req: &FlowRequest) -> CoreResult<FlowResponse>;
}

fn strip_code_fence(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_json() {
        let resp = FlowResponse::parse_model_text(
            r#"{"updatedFields": {"patient.heartRate": 72}, "actionTaken": "Recorded heart rate"}"#,
        )
        .expect("parse");
        assert_eq!(resp.updated_fields.get("patient.heartRate"), Some(&json!(72)));
        assert_eq!(resp.action_taken, "Recorded heart rate");
    }

    #[test]
    fn parses_fenced_json() {
        let resp = FlowResponse::parse_model_text(
            "```json\n{\"updatedFields\": {}, \"actionTaken\": \"Navigated\"}\n```",
        )
        .expect("parse");
        assert!(resp.updated_fields.is_empty());
        assert_eq!(resp.action_taken, "Navigated");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let resp = FlowResponse::parse_model_text("{}").expect("parse");
        assert_eq!(resp, FlowResponse::default());
    }

    #[test]
    fn non_json_text_is_a_flow_error() {
        let err = FlowResponse::parse_model_text("Sure! I updated the BP.").expect_err("reject");
        assert!(matches!(err, CoreError::Flow(_)));

        let err = FlowResponse::parse_model_text("```\n```").expect_err("reject");
        assert!(matches!(err, CoreError::Flow(_)));
    }

    #[test]
    fn request_serialises_camel_case_without_empty_patient() {
        let req = FlowRequest {
            voice_input: "go to dashboard".into(),
            context: "{}".into(),
            patient_id: None,
        };
        let value = serde_json::to_value(&req).expect("serialise");
        assert_eq!(value, json!({"voiceInput": "go to dashboard", "context": "{}"}));
    }
}
