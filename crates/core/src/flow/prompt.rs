use super::FlowRequest;
use crate::intent::FieldKey;

const PREAMBLE: &str = "You are the voice assistant of SmartBridge, an electronic medical record \
for a South African cardiothoracic and renal clinic. A doctor has spoken a command. Decide which \
patient record fields the command updates, if any.";

const RESPONSE_CONTRACT: &str = r#"Respond ONLY with valid JSON (no markdown fences, no extra text):
{
  "updatedFields": { "<field key>": <value>, ... },
  "actionTaken": "one short sentence describing what you understood"
}
Use an empty object for "updatedFields" when the command only navigates or searches.
Never invent values the doctor did not say."#;

/// Build the prompt sent to the model for one voice command.
///
/// The list of field keys is generated from [`FieldKey`] so the prompt and the dispatcher cannot
/// drift apart.
pub fn build_voice_command_prompt(req: &FlowRequest) -> String {
    let mut prompt = String::with_capacity(1024 + req.voice_input.len() + req.context.len());
    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\nRecognised field keys and example values:\n");
    for key in FieldKey::ALL {
        prompt.push_str(&format!("- {}: {}\n", key.path(), key.value_hint()));
    }
    prompt.push('\n');
    prompt.push_str(RESPONSE_CONTRACT);
    prompt.push_str("\n\nPatient context (JSON):\n");
    prompt.push_str(&req.context);
    if let Some(id) = &req.patient_id {
        prompt.push_str(&format!("\n\nActive patient id: {id}"));
    }
    prompt.push_str("\n\nVoice command:\n");
    prompt.push_str(&req.voice_input);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_every_field_key_and_inputs() {
        let req = FlowRequest {
            voice_input: "bp is 150 over 95".into(),
            context: r#"{"patientId":"p1"}"#.into(),
            patient_id: Some("p1".into()),
        };
        let prompt = build_voice_command_prompt(&req);

        for key in FieldKey::ALL {
            assert!(prompt.contains(key.path()), "missing {}", key.path());
        }
        assert!(prompt.contains("bp is 150 over 95"));
        assert!(prompt.contains(r#"{"patientId":"p1"}"#));
        assert!(prompt.contains("Active patient id: p1"));
        assert!(prompt.ends_with("bp is 150 over 95"));
    }
}
