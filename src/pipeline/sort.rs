//! Sort stage: one active (key, direction) pair, or funnel-stage order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::record::{FieldValue, Record, fields};

/// Columns the table view offers as sort keys.
pub const SORTABLE_COLUMNS: &[&str] = &[
    fields::PHONE_NUMBER,
    fields::CITY,
    fields::USER_CLICKED_LINK,
    fields::FREE_DEMO_STARTED,
    fields::FREE_DEMO_ENDED,
    fields::USER_REGISTRATION_COMPLETE,
    fields::SOURCE,
    fields::SCHOOL_NAME,
    fields::PERSONA,
    fields::SORTING_STAGE,
    fields::LEVEL1_TRIAL_STARTS,
    fields::LEVEL3_TRIAL_STARTS,
    fields::ACTIVITY_TYPE,
    fields::CURRENT_LESSON_ID,
    fields::CURRENT_LESSON_SEQUENCE,
    fields::QUESTION_NUMBER,
    fields::LAST_MESSAGE_TIME,
];

pub fn is_sortable(key: &str) -> bool {
    SORTABLE_COLUMNS.contains(&key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Arrow shown next to the active column header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => anyhow::bail!("Invalid sort direction '{}'. Valid values: asc, desc", s),
        }
    }
}

/// The active sort. With no key, records fall back to funnel-stage order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortConfig {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    /// Header-click behaviour: the active column flips direction, any other
    /// column becomes active in ascending order.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.reversed();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    /// Direction indicator for a column, present only on the active one.
    pub fn indicator(&self, key: &str) -> Option<SortDirection> {
        (self.key.as_deref() == Some(key)).then_some(self.direction)
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match &self.key {
            Some(key) => {
                let ordering = compare_values(a.get(key), b.get(key));
                match self.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
            None => a.stage().rank().cmp(&b.stage().rank()),
        }
    }
}

/// Stable sort returning a new, fully ordered list.
pub fn sort(records: &[Record], config: &SortConfig) -> Vec<Record> {
    let mut sorted = records.to_vec();
    // slice::sort_by is stable; equal keys keep input order in both directions
    sorted.sort_by(|a, b| config.compare(a, b));
    sorted
}

/// Values fall into three classes ordered empty < number < text. Absent,
/// null and empty strings are empty. Numbers compare numerically and text
/// lexicographically, so numeric-looking strings stay text.
fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (SortKey::of(a), SortKey::of(b)) {
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(&y),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(&y),
        (x, y) => x.class().cmp(&y.class()),
    }
}

enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

impl SortKey {
    fn of(value: Option<&FieldValue>) -> Self {
        if let Some(n) = value.and_then(FieldValue::as_number) {
            return SortKey::Number(n);
        }
        match value.map(ToString::to_string) {
            Some(text) if !text.is_empty() => SortKey::Text(text),
            _ => SortKey::Empty,
        }
    }

    fn class(&self) -> u8 {
        match self {
            SortKey::Empty => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }
}
