//! Voice command orchestration.
//!
//! One call handles one utterance: validate, fetch patient context, run the AI flow, then
//! dispatch. Any failure before dispatch fails the whole command; there is no rule-only fallback
//! and no retry.

use crate::context::ContextSource;
use crate::flow::{FlowRequest, VoiceCommandFlow};
use crate::intent::{dispatch_intent, FieldUpdates, VoiceIntentResult};
use crate::{CoreError, CoreResult};
use sb_types::NonEmptyText;
use std::sync::Arc;

/// Stateless voice command handler, cheap to clone and share across requests.
#[derive(Clone)]
pub struct VoiceCommandService {
    context: Arc<dyn ContextSource>,
    flow: Arc<dyn VoiceCommandFlow>,
}

impl VoiceCommandService {
    pub fn new(context: Arc<dyn ContextSource>, flow: Arc<dyn VoiceCommandFlow>) -> Self {
        Self { context, flow }
    }

    /// Handle one transcribed voice command.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] if:
    /// - the transcript is blank,
    /// - the patient context cannot be fetched,
    /// - the AI flow fails.
    pub async fn handle(
        &self,
        transcript: &str,
        patient_id: Option<&str>,
    ) -> CoreResult<VoiceIntentResult> {
        let transcript = NonEmptyText::new(transcript)
            .map_err(|e| CoreError::InvalidInput(format!("transcript: {e}")))?;

        let context = self.context.fetch(patient_id).await?;
        let request = FlowRequest {
            voice_input: transcript.to_string(),
            context: context.to_json_string()?,
            patient_id: context.patient_id.clone(),
        };

        let flow = self.flow.run(&request).await?;
        let fields = FieldUpdates::from_map(flow.updated_fields);
        if !fields.unrecognised().is_empty() {
            tracing::debug!("ignoring unrecognised AI fields: {:?}", fields.unrecognised());
        }

        let decision = dispatch_intent(transcript.as_str(), &fields);
        tracing::info!(
            action = %decision.action,
            navigation = decision.action.is_navigation(),
            llm_action = %flow.action_taken,
            "voice command dispatched"
        );

        Ok(VoiceIntentResult::from_decision(
            decision,
            Some(flow.action_taken),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SmartContext;
    use crate::flow::FlowResponse;
    use crate::intent::VoiceAction;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use std::sync::Mutex;

    struct StubContext {
        fail: bool,
    }

    #[async_trait]
    impl ContextSource for StubContext {
        async fn fetch(&self, patient_id: Option<&str>) -> CoreResult<SmartContext> {
            if self.fail {
                return Err(CoreError::ContextRead(std::io::Error::other("store offline")));
            }
            Ok(SmartContext {
                patient_id: patient_id.map(str::to_string),
                patient: Some(json!({"firstName": "Sipho"})),
                ..SmartContext::default()
            })
        }
    }

    struct StubFlow {
        response: CoreResult<Value>,
        seen: Mutex<Vec<FlowRequest>>,
    }

    impl StubFlow {
        fn ok(fields: Value, action_taken: &str) -> Self {
            Self {
                response: Ok(json!({"updatedFields": fields, "actionTaken": action_taken})),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(CoreError::Flow("quota exceeded".into())),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VoiceCommandFlow for StubFlow {
        async fn run(&self, req: &FlowRequest) -> CoreResult<FlowResponse> {
            self.seen.lock().expect("lock").push(req.clone());
            match &self.response {
                Ok(value) => Ok(serde_json::from_value(value.clone()).expect("stub shape")),
                Err(e) => Err(CoreError::Flow(e.to_string())),
            }
        }
    }

    fn service(context: StubContext, flow: Arc<StubFlow>) -> VoiceCommandService {
        VoiceCommandService::new(Arc::new(context), flow)
    }

    #[tokio::test]
    async fn navigation_command_without_fields() {
        let flow = Arc::new(StubFlow::ok(json!({}), "Opened dashboard"));
        let svc = service(StubContext { fail: false }, flow);

        let result = svc.handle("go to dashboard", None).await.expect("handled");
        assert_eq!(result.action, VoiceAction::GoDashboard);
        assert_eq!(result.payload, json!({}));
        assert_eq!(result.llm_action.as_deref(), Some("Opened dashboard"));
    }

    #[tokio::test]
    async fn vitals_command_uses_flow_fields() {
        let flow = Arc::new(StubFlow::ok(
            json!({"patient.bloodPressure": "150/95"}),
            "Updated blood pressure",
        ));
        let svc = service(StubContext { fail: false }, flow.clone());

        let result = svc
            .handle("blood pressure is high", Some("pat-9"))
            .await
            .expect("handled");
        assert_eq!(result.action, VoiceAction::AddVitalSigns);
        assert_eq!(result.payload, json!({"bp": "150/95"}));

        let seen = flow.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].voice_input, "blood pressure is high");
        assert_eq!(seen[0].patient_id.as_deref(), Some("pat-9"));
        let ctx: Map<String, Value> = serde_json::from_str(&seen[0].context).expect("context json");
        assert_eq!(ctx.get("patientId"), Some(&json!("pat-9")));
        assert_eq!(ctx.get("patient"), Some(&json!({"firstName": "Sipho"})));
    }

    #[tokio::test]
    async fn medication_field_overrides_find_patient() {
        let flow = Arc::new(StubFlow::ok(
            json!({"patient.medication": {"name": "Aspirin"}}),
            "Added medication",
        ));
        let svc = service(StubContext { fail: false }, flow);

        let result = svc
            .handle("find patient John Smith", None)
            .await
            .expect("handled");
        assert_eq!(result.action, VoiceAction::AddMedication);
        assert_eq!(result.payload, json!({"name": "Aspirin"}));
    }

    #[tokio::test]
    async fn blank_transcript_is_rejected_before_flow() {
        let flow = Arc::new(StubFlow::ok(json!({}), "unused"));
        let svc = service(StubContext { fail: false }, flow.clone());

        let err = svc.handle("   ", None).await.expect_err("blank rejected");
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert!(flow.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn context_failure_fails_the_command() {
        let flow = Arc::new(StubFlow::ok(json!({}), "unused"));
        let svc = service(StubContext { fail: true }, flow.clone());

        let err = svc
            .handle("go to dashboard", Some("pat-1"))
            .await
            .expect_err("context failure");
        assert!(matches!(err, CoreError::ContextRead(_)));
        assert!(flow.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn flow_failure_has_no_rule_only_fallback() {
        let svc = service(StubContext { fail: false }, Arc::new(StubFlow::failing()));

        let err = svc
            .handle("go to dashboard", None)
            .await
            .expect_err("flow failure");
        assert!(err.to_string().contains("quota exceeded"));
    }
}
