//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::{CoreError, CoreResult};
use icd10::Icd10Catalogue;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings for the Gemini `generateContent` endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiConfig {
    /// Create a new `GeminiConfig`.
    ///
    /// The API key is optional here so the server can start (and serve ICD-10 routes) without
    /// one; voice commands fail until it is provided.
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> CoreResult<Self> {
        let model = model.trim().to_string();
        if model.is_empty() {
            return Err(CoreError::InvalidInput("Gemini model cannot be empty".into()));
        }
        if model.contains('/') || model.contains('?') {
            return Err(CoreError::InvalidInput(format!(
                "Gemini model name contains invalid characters: {model}"
            )));
        }

        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(CoreError::InvalidInput(format!(
                "Gemini base URL must start with http:// or https://: {base_url}"
            )));
        }

        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self {
            api_key,
            model,
            base_url,
        })
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_dir: PathBuf,
    gemini: GeminiConfig,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(patient_data_dir: PathBuf, gemini: GeminiConfig) -> CoreResult<Self> {
        if patient_data_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput(
                "patient_data_dir cannot be empty".into(),
            ));
        }

        Ok(Self {
            patient_data_dir,
            gemini,
        })
    }

    pub fn patient_data_dir(&self) -> &Path {
        &self.patient_data_dir
    }

    pub fn gemini(&self) -> &GeminiConfig {
        &self.gemini
    }
}

/// Build a [`GeminiConfig`] from optional environment values.
///
/// `None` or blank values fall back to the defaults in [`crate::constants`].
pub fn gemini_config_from_env_values(
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
) -> CoreResult<GeminiConfig> {
    fn non_blank(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    GeminiConfig::new(
        non_blank(api_key),
        non_blank(model).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
        non_blank(base_url).unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.into()),
    )
}

/// Resolve the ICD-10 catalogue used for the lifetime of the process.
///
/// With no override the bundled list is used. An override must point at a readable JSON file in
/// the same `[{ "code", "description" }]` shape.
pub fn resolve_icd10_catalogue(override_path: Option<PathBuf>) -> CoreResult<Arc<Icd10Catalogue>> {
    match override_path {
        Some(path) => {
            if !path.is_file() {
                return Err(CoreError::InvalidInput(format!(
                    "SMARTBRIDGE_ICD10_PATH override is not a file: {}",
                    path.display()
                )));
            }
            Ok(Arc::new(Icd10Catalogue::from_path(&path)?))
        }
        None => match Icd10Catalogue::bundled() {
            Ok(catalogue) => Ok(Arc::new(catalogue.clone())),
            Err(e) => Err(CoreError::Config(format!(
                "bundled ICD-10 list failed to load: {e}"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_defaults_apply_to_blank_values() {
        let cfg = gemini_config_from_env_values(Some("  ".into()), None, Some("".into()))
            .expect("valid config");
        assert_eq!(cfg.api_key(), None);
        assert_eq!(cfg.model(), DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.base_url(), DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn generate_content_url_strips_trailing_slash() {
        let cfg = gemini_config_from_env_values(
            Some("key".into()),
            Some("gemini-test".into()),
            Some("http://localhost:8080/".into()),
        )
        .expect("valid config");
        assert_eq!(
            cfg.generate_content_url(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
        assert_eq!(cfg.api_key(), Some("key"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = gemini_config_from_env_values(Some("secret-key".into()), None, None)
            .expect("valid config");
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = gemini_config_from_env_values(None, None, Some("ftp://example".into()))
            .expect_err("ftp rejected");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn rejects_model_with_path_characters() {
        let err = gemini_config_from_env_values(None, Some("a/b".into()), None)
            .expect_err("slash rejected");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn core_config_rejects_empty_data_dir() {
        let gemini = gemini_config_from_env_values(None, None, None).expect("defaults");
        let err = CoreConfig::new(PathBuf::new(), gemini).expect_err("empty dir rejected");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn icd10_catalogue_defaults_to_bundled() {
        let catalogue = resolve_icd10_catalogue(None).expect("bundled list");
        assert_eq!(catalogue.lookup(Some("I10")), Some("I10"));
    }

    #[test]
    fn icd10_override_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = resolve_icd10_catalogue(Some(dir.path().join("nope.json")))
            .expect_err("missing file rejected");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn icd10_override_is_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("icd10.json");
        std::fs::write(
            &path,
            r#"[{"code": "X99", "description": "Test-only condition"}]"#,
        )
        .expect("write override");

        let catalogue = resolve_icd10_catalogue(Some(path)).expect("override loads");
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.lookup(Some("test-only")), Some("X99"));
    }
}
