//! ICD-10 catalogue types and loading.
//!
//! Responsibilities:
//! - Define the public [`Icd10Entry`] carrier and the immutable [`Icd10Catalogue`]
//! - Parse reference lists from JSON, surfacing the failing path on schema mismatch
//! - Enforce code uniqueness while preserving list order
//!
//! Notes:
//! - The bundled list is compiled in from `data/icd10.json` and parsed once per process.
//! - An override list (for example a regenerated export) can be loaded from disk at startup.

use crate::{Icd10Error, Icd10Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

const BUNDLED_ICD10_JSON: &str = include_str!("../data/icd10.json");

static BUNDLED: LazyLock<Icd10Result<Icd10Catalogue>> =
    LazyLock::new(|| Icd10Catalogue::from_json(BUNDLED_ICD10_JSON));

/// A single ICD-10 reference entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icd10Entry {
    /// The diagnostic code, for example `I50.9`.
    pub code: String,

    /// Human-readable description, for example `Heart failure, unspecified`.
    pub description: String,
}

/// Entry plus lowercase forms used for case-insensitive matching.
#[derive(Clone, Debug)]
pub(crate) struct IndexedEntry {
    pub(crate) entry: Icd10Entry,
    pub(crate) code_lower: String,
    pub(crate) description_lower: String,
}

/// Immutable, ordered ICD-10 reference list.
///
/// No two entries share a code. Order is the order of the source list and is significant: both
/// lookup and search report the earliest matching entries first.
#[derive(Clone, Debug)]
pub struct Icd10Catalogue {
    pub(crate) entries: Vec<IndexedEntry>,
}

impl Icd10Catalogue {
    /// The reference list bundled with this crate.
    ///
    /// Parsed on first access and shared for the remainder of the process.
    ///
    /// # Errors
    ///
    /// Returns a reference to the load error if the bundled JSON is malformed.
    pub fn bundled() -> Result<&'static Icd10Catalogue, &'static Icd10Error> {
        (*BUNDLED).as_ref()
    }

    /// Build a catalogue from entries, dropping later duplicates of a code.
    ///
    /// Codes are compared case-insensitively after trimming. Each dropped duplicate is logged.
    ///
    /// # Errors
    ///
    /// Returns [`Icd10Error::EmptyCode`] if any entry has a blank code.
    pub fn from_entries(entries: Vec<Icd10Entry>) -> Icd10Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut indexed = Vec::with_capacity(entries.len());

        for (idx, entry) in entries.into_iter().enumerate() {
            let code = entry.code.trim().to_string();
            if code.is_empty() {
                return Err(Icd10Error::EmptyCode(idx));
            }
            let code_lower = code.to_lowercase();
            if !seen.insert(code_lower.clone()) {
                tracing::warn!("dropping duplicate ICD-10 code {} at index {}", code, idx);
                continue;
            }

            let description = entry.description.trim().to_string();
            let description_lower = description.to_lowercase();
            indexed.push(IndexedEntry {
                entry: Icd10Entry { code, description },
                code_lower,
                description_lower,
            });
        }

        Ok(Self { entries: indexed })
    }

    /// Parse a catalogue from a JSON array of `{ "code", "description" }` objects.
    ///
    /// This uses `serde_path_to_error` so a malformed export reports the failing element, for
    /// example `[12].description`.
    ///
    /// # Errors
    ///
    /// Returns [`Icd10Error`] if:
    /// - the JSON does not match the expected schema,
    /// - any entry has a blank code.
    pub fn from_json(json_text: &str) -> Icd10Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        let entries = match serde_path_to_error::deserialize::<_, Vec<Icd10Entry>>(&mut deserializer)
        {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                return Err(Icd10Error::InvalidJson {
                    path,
                    message: source.to_string(),
                });
            }
        };

        Self::from_entries(entries)
    }

    /// Read and parse a catalogue from a JSON file.
    pub fn from_path(path: &Path) -> Icd10Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let catalogue = Self::from_json(&text)?;
        tracing::info!(
            "loaded {} ICD-10 entries from {}",
            catalogue.len(),
            path.display()
        );
        Ok(catalogue)
    }

    /// Iterate over entries in list order.
    pub fn entries(&self) -> impl Iterator<Item = &Icd10Entry> {
        self.entries.iter().map(|e| &e.entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch the entry with exactly this code (case-insensitive).
    pub fn get(&self, code: &str) -> Option<&Icd10Entry> {
        let wanted = code.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.code_lower == wanted)
            .map(|e| &e.entry)
    }
}
