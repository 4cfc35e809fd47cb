//! Voice intent dispatch.
//!
//! Turns one transcribed utterance, plus the field updates an AI flow extracted from it, into
//! exactly one [`VoiceAction`] and a payload the calling UI can execute.
//!
//! Dispatch is a pure function of its inputs and holds no state between calls. See
//! [`dispatch_intent`] for the rule order.

mod action;
mod fields;
mod rules;

pub use action::VoiceAction;
pub use fields::{FieldKey, FieldUpdates};
pub use rules::{dispatch_intent, IntentDecision};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a voice command: the dispatched action plus the AI flow's own label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceIntentResult {
    pub action: VoiceAction,
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_action: Option<String>,
}

impl VoiceIntentResult {
    pub fn from_decision(decision: IntentDecision, llm_action: Option<String>) -> Self {
        Self {
            action: decision.action,
            payload: decision.payload,
            llm_action,
        }
    }
}
