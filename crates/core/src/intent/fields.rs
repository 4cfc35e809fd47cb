//! Typed view over the AI flow's `updatedFields` map.
//!
//! The flow reports updates as dot-path keys such as `patient.bloodPressure`. Only the keys in
//! [`FieldKey`] drive dispatch; anything else is kept by name for diagnostics.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field updates recognised by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    BloodPressure,
    HeartRate,
    Temperature,
    Medication,
    Allergy,
    ChronicCondition,
    Referral,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::BloodPressure,
        FieldKey::HeartRate,
        FieldKey::Temperature,
        FieldKey::Medication,
        FieldKey::Allergy,
        FieldKey::ChronicCondition,
        FieldKey::Referral,
    ];

    /// The dot-path key used by the AI flow.
    pub fn path(self) -> &'static str {
        match self {
            FieldKey::BloodPressure => "patient.bloodPressure",
            FieldKey::HeartRate => "patient.heartRate",
            FieldKey::Temperature => "patient.temperature",
            FieldKey::Medication => "patient.medication",
            FieldKey::Allergy => "patient.allergy",
            FieldKey::ChronicCondition => "patient.chronicCondition",
            FieldKey::Referral => "patient.referral",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.path() == path)
    }

    /// Example value shown to the AI flow so it emits the shape the UI handlers expect.
    pub fn value_hint(self) -> &'static str {
        match self {
            FieldKey::BloodPressure => r#""150/95""#,
            FieldKey::HeartRate => "72",
            FieldKey::Temperature => "37.2",
            FieldKey::Medication => {
                r#"{"name": "Aspirin", "dosage": "100mg", "frequency": "daily"}"#
            }
            FieldKey::Allergy => {
                r#"{"allergen": "Penicillin", "reaction": "rash", "severity": "moderate"}"#
            }
            FieldKey::ChronicCondition => r#"{"name": "Chronic kidney disease, stage 3"}"#,
            FieldKey::Referral => {
                r#"{"specialty": "Nephrology", "reason": "declining eGFR", "urgency": "routine"}"#
            }
        }
    }
}

/// Recognised field updates, keyed by [`FieldKey`].
///
/// A JSON `null` value counts as absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldUpdates {
    recognised: BTreeMap<FieldKey, Value>,
    unrecognised: Vec<String>,
}

impl FieldUpdates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut updates = Self::new();
        for (path, value) in map {
            if value.is_null() {
                continue;
            }
            match FieldKey::from_path(&path) {
                Some(key) => {
                    updates.recognised.insert(key, value);
                }
                None => updates.unrecognised.push(path),
            }
        }
        updates
    }

    pub fn insert(&mut self, key: FieldKey, value: Value) {
        if value.is_null() {
            self.recognised.remove(&key);
        } else {
            self.recognised.insert(key, value);
        }
    }

    pub fn with(mut self, key: FieldKey, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: FieldKey) -> Option<&Value> {
        self.recognised.get(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.recognised.is_empty()
    }

    /// Keys the flow returned that the dispatcher does not act on.
    pub fn unrecognised(&self) -> &[String] {
        &self.unrecognised
    }
}

impl From<Map<String, Value>> for FieldUpdates {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_map(map)
    }
}
