//! Analytics records: one user's journey through the funnel.
//!
//! A [`Record`] is a flat mapping of field names to primitive values. Its
//! [`FunnelStage`] is resolved once when the record is built and is never
//! recomputed afterwards.

pub mod ingest;
pub mod stage;
pub mod timestamp;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use ingest::{load_records, parse_records};
pub use stage::FunnelStage;
pub use timestamp::parse_timestamp;

/// Field names as they appear in the analytics payload.
pub mod fields {
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const CITY: &str = "city";
    pub const SCHOOL_NAME: &str = "schoolName";
    pub const PERSONA: &str = "persona";
    pub const SOURCE: &str = "source";
    pub const ACTIVITY_TYPE: &str = "activityType";
    pub const ACCEPTABLE_MESSAGES: &str = "acceptableMessages";
    pub const USER_CLICKED_LINK: &str = "userClickedLink";
    pub const FREE_DEMO_STARTED: &str = "freeDemoStarted";
    pub const FREE_DEMO_ENDED: &str = "freeDemoEnded";
    pub const USER_REGISTRATION_COMPLETE: &str = "userRegistrationComplete";
    pub const SORTING_STAGE: &str = "sortingStage";
    pub const LEVEL1_TRIAL_STARTS: &str = "level1TrialStarts";
    pub const LEVEL3_TRIAL_STARTS: &str = "level3TrialStarts";
    pub const CURRENT_LESSON_ID: &str = "currentLessonId";
    pub const CURRENT_LESSON_SEQUENCE: &str = "currentLessonSequence";
    pub const QUESTION_NUMBER: &str = "questionNumber";
    pub const LAST_MESSAGE: &str = "lastMessage";
    pub const LAST_MESSAGE_TIME: &str = "lastMessageTime";

    /// The four funnel timestamp fields, in funnel order.
    pub const TIMESTAMPS: [&str; 4] = [
        USER_CLICKED_LINK,
        FREE_DEMO_STARTED,
        FREE_DEMO_ENDED,
        USER_REGISTRATION_COMPLETE,
    ];
}

/// A primitive field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// String form used for comparison, search and export. `Null` is empty.
impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

/// One row of analytics data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    fields: BTreeMap<String, FieldValue>,
    #[serde(skip)]
    stage: FunnelStage,
}

impl Record {
    /// Build a record from field pairs.
    ///
    /// The stage comes from `sortingStage` when present; otherwise it is
    /// derived from the timestamp fields and written back as `sortingStage`.
    pub fn from_fields<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldValue)>,
    {
        let map: BTreeMap<String, FieldValue> =
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let mut record = Self {
            fields: map,
            stage: FunnelStage::Unknown,
        };

        record.stage = match record.text(fields::SORTING_STAGE) {
            Some(label) => FunnelStage::from_label(&label),
            None => {
                let derived = FunnelStage::from_timestamps(&record);
                record.fields.insert(
                    fields::SORTING_STAGE.to_string(),
                    FieldValue::from(derived.label()),
                );
                derived
            }
        };
        record
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// String form of a field; `None` when absent or null.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name) {
            None | Some(FieldValue::Null) => None,
            Some(value) => Some(value.to_string()),
        }
    }

    pub fn stage(&self) -> FunnelStage {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_string_forms() {
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(FieldValue::Number(5.0).to_string(), "5");
        assert_eq!(FieldValue::Number(5.5).to_string(), "5.5");
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
        assert_eq!(FieldValue::from("Lahore").to_string(), "Lahore");
    }

    #[test]
    fn test_field_value_deserializes_untagged() {
        let values: Vec<FieldValue> =
            serde_json::from_str(r#"[null, true, 3, 2.5, "text"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Bool(true),
                FieldValue::Number(3.0),
                FieldValue::Number(2.5),
                FieldValue::from("text"),
            ]
        );
    }

    #[test]
    fn test_text_is_none_for_null_and_absent() {
        let record = Record::from_fields([(fields::CITY, FieldValue::Null)]);
        assert_eq!(record.text(fields::CITY), None);
        assert_eq!(record.text(fields::PERSONA), None);
    }

    #[test]
    fn test_explicit_stage_is_kept() {
        let record = Record::from_fields([
            (fields::SORTING_STAGE, FieldValue::from("Demo Ended")),
            (fields::USER_REGISTRATION_COMPLETE, FieldValue::from("2024-01-01")),
        ]);
        assert_eq!(record.stage(), FunnelStage::DemoEnded);
    }

    #[test]
    fn test_derived_stage_is_written_back() {
        let record =
            Record::from_fields([(fields::USER_CLICKED_LINK, FieldValue::from("2024-01-01"))]);
        assert_eq!(record.stage(), FunnelStage::ClickedLink);
        assert_eq!(
            record.text(fields::SORTING_STAGE).as_deref(),
            Some("Clicked Link")
        );
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = Record::from_fields([
            (fields::PHONE_NUMBER, FieldValue::from("0300")),
            (fields::SORTING_STAGE, FieldValue::from("Unknown")),
        ]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["phoneNumber"], "0300");
        assert_eq!(json["sortingStage"], "Unknown");
    }
}
