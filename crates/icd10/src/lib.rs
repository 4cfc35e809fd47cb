//! ICD-10 reference catalogue.
//!
//! This crate owns the static ICD-10 reference list used to code free-text diagnoses:
//! - loading the list (bundled at compile time, or from an override file at startup)
//! - enforcing the "one entry per code" invariant
//! - layered lookup (exact code, description substring, word subset)
//! - browse/search over codes and descriptions
//!
//! The catalogue is immutable once loaded. Lookups never mutate it and never fail: absence of a
//! match is an ordinary outcome, represented as `None` or an empty result.

pub mod catalogue;
pub mod lookup;

pub use catalogue::{Icd10Catalogue, Icd10Entry};
pub use lookup::CodedDiagnosis;

/// Errors returned while loading an ICD-10 reference list.
#[derive(Debug, thiserror::Error)]
pub enum Icd10Error {
    #[error("invalid ICD-10 JSON at {path}: {message}")]
    InvalidJson { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ICD-10 entry at index {0} has an empty code")]
    EmptyCode(usize),
}

/// Type alias for Results that can fail with an [`Icd10Error`].
pub type Icd10Result<T> = Result<T, Icd10Error>;

/// Look up the best-matching code for a diagnosis phrase in the bundled reference list.
///
/// Returns `None` for empty input, for no match, and (after logging) if the bundled list could
/// not be loaded.
pub fn lookup_icd10(text: Option<&str>) -> Option<&'static str> {
    match Icd10Catalogue::bundled() {
        Ok(catalogue) => catalogue.lookup(text),
        Err(e) => {
            tracing::error!("bundled ICD-10 list unavailable: {}", e);
            None
        }
    }
}

/// Search the bundled reference list by code or description substring.
pub fn search_icd10(query: &str, limit: usize) -> Vec<&'static Icd10Entry> {
    match Icd10Catalogue::bundled() {
        Ok(catalogue) => catalogue.search(query, limit),
        Err(e) => {
            tracing::error!("bundled ICD-10 list unavailable: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_list_loads() {
        let catalogue = Icd10Catalogue::bundled().expect("bundled list parses");
        assert!(!catalogue.is_empty());
    }

    #[test]
    fn free_functions_use_bundled_list() {
        assert_eq!(lookup_icd10(Some("i10")), Some("I10"));
        assert_eq!(lookup_icd10(None), None);
        assert_eq!(lookup_icd10(Some("")), None);

        let hits = search_icd10("dialysis", 10);
        let codes: Vec<&str> = hits.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["Z49.1", "Z49.2", "Z99.2"]);
    }
}
