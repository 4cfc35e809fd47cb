use serde::{Deserialize, Serialize};

/// Application actions a voice command can resolve to.
///
/// The wire form is the snake_case name, for example `add_vital_signs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceAction {
    FindPatient,
    GoDashboard,
    GoSummary,
    GoPersonal,
    GoClinical,
    GoHistory,
    GoInvestigations,
    GoTreatment,
    GoScans,
    GoVisits,
    GoReferral,
    AddVitalSigns,
    AddMedication,
    AddAllergy,
    AddChronicCondition,
    CreateReferral,
    Unknown,
}

impl VoiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            VoiceAction::FindPatient => "find_patient",
            VoiceAction::GoDashboard => "go_dashboard",
            VoiceAction::GoSummary => "go_summary",
            VoiceAction::GoPersonal => "go_personal",
            VoiceAction::GoClinical => "go_clinical",
            VoiceAction::GoHistory => "go_history",
            VoiceAction::GoInvestigations => "go_investigations",
            VoiceAction::GoTreatment => "go_treatment",
            VoiceAction::GoScans => "go_scans",
            VoiceAction::GoVisits => "go_visits",
            VoiceAction::GoReferral => "go_referral",
            VoiceAction::AddVitalSigns => "add_vital_signs",
            VoiceAction::AddMedication => "add_medication",
            VoiceAction::AddAllergy => "add_allergy",
            VoiceAction::AddChronicCondition => "add_chronic_condition",
            VoiceAction::CreateReferral => "create_referral",
            VoiceAction::Unknown => "unknown",
        }
    }

    /// Whether this action only changes the visible screen.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            VoiceAction::GoDashboard
                | VoiceAction::GoSummary
                | VoiceAction::GoPersonal
                | VoiceAction::GoClinical
                | VoiceAction::GoHistory
                | VoiceAction::GoInvestigations
                | VoiceAction::GoTreatment
                | VoiceAction::GoScans
                | VoiceAction::GoVisits
                | VoiceAction::GoReferral
        )
    }
}

impl std::fmt::Display for VoiceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
