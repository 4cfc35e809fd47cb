//! Patient context for AI prompts.
//!
//! A [`SmartContext`] is a read-only snapshot of one patient (record, latest vitals, latest
//! note) handed to the AI flow alongside a voice command. The dispatcher never mutates it.
//!
//! [`FileContextStore`] reads snapshots from a directory tree:
//! `PATIENT_DATA_DIR/<patient_id>/{patient.json, vitals.json, notes.json}`.

use crate::constants::{
    NOTES_JSON_FILENAME, NOTES_TIMESTAMP_FIELD, PATIENT_JSON_FILENAME, VITALS_JSON_FILENAME,
    VITALS_TIMESTAMP_FIELD,
};
use crate::{CoreError, CoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sb_types::PatientId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Snapshot of a patient passed to the AI flow as prompt context.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartContext {
    pub patient_id: Option<String>,
    pub patient: Option<Value>,
    pub latest_vitals: Option<Value>,
    pub latest_note: Option<Value>,
}

impl SmartContext {
    /// Serialise for embedding in a prompt.
    pub fn to_json_string(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(CoreError::Serialization)
    }
}

/// Source of [`SmartContext`] snapshots.
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Fetch the context for a patient, or an empty context when no patient is given.
    async fn fetch(&self, patient_id: Option<&str>) -> CoreResult<SmartContext>;
}

/// File-backed patient context store.
#[derive(Clone, Debug)]
pub struct FileContextStore {
    base_dir: PathBuf,
}

impl FileContextStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn patient_dir(&self, id: &PatientId) -> PathBuf {
        self.base_dir.join(id.as_str())
    }

    /// List the ids of all patients that have a `patient.json`, sorted.
    ///
    /// A missing base directory yields an empty list. Entries whose names are not valid patient
    /// ids are skipped.
    pub fn list_patients(&self) -> CoreResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.base_dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CoreError::ContextRead(e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(CoreError::ContextRead)?;
            let path = entry.path();
            if !path.join(PATIENT_JSON_FILENAME).is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|os| os.to_str()) else {
                continue;
            };
            match PatientId::parse(name) {
                Ok(id) => ids.push(id.to_string()),
                Err(_) => tracing::warn!("skipping invalid patient directory: {}", path.display()),
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl ContextSource for FileContextStore {
    async fn fetch(&self, patient_id: Option<&str>) -> CoreResult<SmartContext> {
        let Some(raw) = patient_id.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(SmartContext::default());
        };
        let id = PatientId::parse(raw)
            .map_err(|e| CoreError::InvalidInput(format!("patient id: {e}")))?;

        let dir = self.patient_dir(&id);
        let patient: Option<Value> = read_json_opt(&dir.join(PATIENT_JSON_FILENAME)).await?;
        if patient.is_none() {
            tracing::debug!("no patient record for {}", id);
        }

        let vitals: Option<Vec<Value>> = read_json_opt(&dir.join(VITALS_JSON_FILENAME)).await?;
        let notes: Option<Vec<Value>> = read_json_opt(&dir.join(NOTES_JSON_FILENAME)).await?;

        Ok(SmartContext {
            patient_id: Some(id.to_string()),
            patient,
            latest_vitals: vitals.and_then(|v| latest_by(v, VITALS_TIMESTAMP_FIELD)),
            latest_note: notes.and_then(|n| latest_by(n, NOTES_TIMESTAMP_FIELD)),
        })
    }
}

/// Read and parse a JSON file, treating a missing file as `None`.
async fn read_json_opt<T: DeserializeOwned>(path: &Path) -> CoreResult<Option<T>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CoreError::ContextRead(e)),
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| CoreError::ContextParse {
            path: path.to_path_buf(),
            source,
        })
}

/// The record with the greatest RFC 3339 timestamp in `field`.
///
/// Records with a missing or unparseable timestamp sort before all dated records. Ties resolve to
/// the later record in the list.
fn latest_by(records: Vec<Value>, field: &str) -> Option<Value> {
    records.into_iter().max_by_key(|record| {
        record
            .get(field)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    })
}
