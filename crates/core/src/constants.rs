//! Constants used throughout the SmartBridge core crate.
//!
//! Defaults for startup configuration and the filenames of the patient context store live here
//! so the binaries, the CLI and the tests agree on them.

/// Default directory for the patient context store when no explicit directory is configured.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "patient_data";

/// Filename of the patient record inside a patient directory.
pub const PATIENT_JSON_FILENAME: &str = "patient.json";

/// Filename of the vital-signs history inside a patient directory.
pub const VITALS_JSON_FILENAME: &str = "vitals.json";

/// Filename of the clinical notes history inside a patient directory.
pub const NOTES_JSON_FILENAME: &str = "notes.json";

/// Timestamp field used to order vital-sign records.
pub const VITALS_TIMESTAMP_FIELD: &str = "recordedAt";

/// Timestamp field used to order clinical notes.
pub const NOTES_TIMESTAMP_FIELD: &str = "createdAt";

/// Gemini model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Gemini API base URL used when `GEMINI_BASE_URL` is not set.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Number of ICD-10 entries returned by a search when the caller gives no limit.
pub const DEFAULT_ICD10_SEARCH_LIMIT: usize = 20;

/// Upper bound on the number of ICD-10 entries a single search may return.
pub const MAX_ICD10_SEARCH_LIMIT: usize = 100;
