use crate::models::HealthRes;

/// Health service shared by every SmartBridge binary that serves HTTP.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Report that the service is up.
    ///
    /// There are no downstream checks: the ICD-10 list is in memory and the AI flow is only
    /// contacted per voice command.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "SmartBridge is alive".into(),
        }
    }
}
