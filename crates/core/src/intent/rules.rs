//! Dispatch rule tables.
//!
//! Rules are evaluated in table order and every match overwrites the action chosen so far, so the
//! last matching rule wins. Field rules run after keyword rules; an AI-extracted clinical update
//! therefore takes precedence over a navigation keyword in the same utterance.

use super::{FieldKey, FieldUpdates, VoiceAction};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

static FIND_PATIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"find patient (.+)").expect("find-patient pattern is a valid regex")
});

/// Navigation keywords, matched as substrings of the lowercased transcript.
const KEYWORD_RULES: [(&str, VoiceAction); 10] = [
    ("dashboard", VoiceAction::GoDashboard),
    ("summary", VoiceAction::GoSummary),
    ("personal", VoiceAction::GoPersonal),
    ("clinical", VoiceAction::GoClinical),
    ("history", VoiceAction::GoHistory),
    ("investigation", VoiceAction::GoInvestigations),
    ("treatment", VoiceAction::GoTreatment),
    ("scan", VoiceAction::GoScans),
    ("visit", VoiceAction::GoVisits),
    ("referral", VoiceAction::GoReferral),
];

#[derive(Clone, Copy, Debug)]
enum PayloadEffect {
    /// Insert the value under this key, keeping whatever the payload already holds.
    Merge(&'static str),
    /// Discard the current payload and use the value as-is.
    Replace,
}

struct FieldRule {
    key: FieldKey,
    action: VoiceAction,
    effect: PayloadEffect,
}

const FIELD_RULES: [FieldRule; 7] = [
    FieldRule {
        key: FieldKey::BloodPressure,
        action: VoiceAction::AddVitalSigns,
        effect: PayloadEffect::Merge("bp"),
    },
    FieldRule {
        key: FieldKey::HeartRate,
        action: VoiceAction::AddVitalSigns,
        effect: PayloadEffect::Merge("hr"),
    },
    FieldRule {
        key: FieldKey::Temperature,
        action: VoiceAction::AddVitalSigns,
        effect: PayloadEffect::Merge("temp"),
    },
    FieldRule {
        key: FieldKey::Medication,
        action: VoiceAction::AddMedication,
        effect: PayloadEffect::Replace,
    },
    FieldRule {
        key: FieldKey::Allergy,
        action: VoiceAction::AddAllergy,
        effect: PayloadEffect::Replace,
    },
    FieldRule {
        key: FieldKey::ChronicCondition,
        action: VoiceAction::AddChronicCondition,
        effect: PayloadEffect::Replace,
    },
    FieldRule {
        key: FieldKey::Referral,
        action: VoiceAction::CreateReferral,
        effect: PayloadEffect::Replace,
    },
];

/// The action chosen for an utterance and the payload its handler receives.
///
/// The payload is a JSON object unless a replacing field rule installed a non-object value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentDecision {
    pub action: VoiceAction,
    pub payload: Value,
}

impl IntentDecision {
    pub fn unknown() -> Self {
        Self {
            action: VoiceAction::Unknown,
            payload: Value::Object(Map::new()),
        }
    }

    fn merge(&mut self, key: &str, value: Value) {
        let mut map = match std::mem::take(&mut self.payload) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        map.insert(key.to_string(), value);
        self.payload = Value::Object(map);
    }
}

impl Default for IntentDecision {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Map an utterance and its extracted field updates to one action.
///
/// Rules, in order, each overwriting the action of any earlier match:
/// 1. `find patient <name>` sets `find_patient` with `payload.name`, captured from the
///    lowercased transcript as-is
/// 2. navigation keywords (`dashboard` … `referral`) set the matching `go_*` action
/// 3. field updates: vital signs merge `bp`/`hr`/`temp` into the payload; medication, allergy,
///    chronic condition and referral replace the payload with the field's value
///
/// With no match the result is `unknown` with an empty payload.
pub fn dispatch_intent(transcript: &str, fields: &FieldUpdates) -> IntentDecision {
    let mut decision = IntentDecision::unknown();

    let lowered = transcript.to_lowercase();

    if let Some(caps) = FIND_PATIENT.captures(&lowered) {
        decision.action = VoiceAction::FindPatient;
        decision.merge("name", Value::String(caps[1].to_string()));
    }

    for (keyword, action) in KEYWORD_RULES {
        if lowered.contains(keyword) {
            decision.action = action;
        }
    }

    for rule in &FIELD_RULES {
        let Some(value) = fields.get(rule.key) else {
            continue;
        };
        decision.action = rule.action;
        match rule.effect {
            PayloadEffect::Merge(name) => decision.merge(name, value.clone()),
            PayloadEffect::Replace => decision.payload = value.clone(),
        }
    }

    decision
}
