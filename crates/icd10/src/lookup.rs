//! Free-text lookup and search over an [`Icd10Catalogue`].
//!
//! Lookup strategy, in strict priority order (first hit wins):
//! 1. exact case-insensitive code match
//! 2. description contains the whole phrase (case-insensitive)
//! 3. description contains every whitespace-delimited word of the phrase, in any order
//!
//! Medical phrasing varies, so later stages trade precision for recall. Suggested codes are
//! confirmed by a clinician before they are stored.

use crate::catalogue::{Icd10Catalogue, Icd10Entry, IndexedEntry};
use serde::{Deserialize, Serialize};

/// Result of coding a single free-text diagnosis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedDiagnosis {
    /// The diagnosis text as supplied by the caller.
    pub text: String,

    /// The suggested code, if any stage matched.
    pub code: Option<String>,
}

impl Icd10Catalogue {
    /// Return the best-matching code for a diagnosis phrase.
    ///
    /// `None` and blank input return `None`; so does a phrase no stage can match.
    pub fn lookup(&self, text: Option<&str>) -> Option<&str> {
        self.lookup_entry(text).map(|e| e.code.as_str())
    }

    /// Like [`Icd10Catalogue::lookup`] but returns the whole matched entry.
    pub fn lookup_entry(&self, text: Option<&str>) -> Option<&Icd10Entry> {
        let needle = text.map(str::trim).filter(|t| !t.is_empty())?.to_lowercase();

        self.find(|e| e.code_lower == needle)
            .or_else(|| self.find(|e| e.description_lower.contains(&needle)))
            .or_else(|| {
                let tokens: Vec<&str> = needle.split_whitespace().collect();
                self.find(|e| tokens.iter().all(|t| e.description_lower.contains(t)))
            })
    }

    /// Search by code or description substring.
    ///
    /// A blank query returns the first `limit` entries (browse view). Otherwise every entry whose
    /// code or description contains the query, case-insensitively, in list order, truncated to
    /// `limit`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Icd10Entry> {
        let query = query.trim().to_lowercase();

        self.entries
            .iter()
            .filter(|e| {
                query.is_empty()
                    || e.code_lower.contains(&query)
                    || e.description_lower.contains(&query)
            })
            .take(limit)
            .map(|e| &e.entry)
            .collect()
    }

    /// Code several diagnoses at once, preserving input order.
    pub fn code_diagnoses<I, S>(&self, texts: I) -> Vec<CodedDiagnosis>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| {
                let text = text.as_ref();
                CodedDiagnosis {
                    text: text.to_string(),
                    code: self.lookup(Some(text)).map(str::to_string),
                }
            })
            .collect()
    }

    fn find(&self, pred: impl Fn(&IndexedEntry) -> bool) -> Option<&Icd10Entry> {
        self.entries.iter().find(|e| pred(e)).map(|e| &e.entry)
    }
}
