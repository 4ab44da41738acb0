//! Filter stage: phone search, date range and equality predicates.

use chrono::NaiveDateTime;

use crate::record::{Record, fields, parse_timestamp};

/// Inclusive date window over a single timestamp column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub column: String,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn new(column: impl Into<String>, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            column: column.into(),
            from,
            to,
        }
    }

    /// Whether the record's column falls inside the window.
    ///
    /// Absent or unparsable values never match.
    pub fn contains(&self, record: &Record) -> bool {
        match record.text(&self.column).as_deref().and_then(parse_timestamp) {
            Some(at) => at >= self.from && at <= self.to,
            None => false,
        }
    }
}

/// Independently optional predicates, ANDed together.
///
/// `None` and empty strings impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub phone_number_search: Option<String>,
    pub date_range: Option<DateRange>,
    pub activity_type: Option<String>,
    pub acceptable_messages: Option<String>,
    pub persona: Option<String>,
    pub source: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        active(&self.phone_number_search).is_none()
            && self.date_range.is_none()
            && active(&self.activity_type).is_none()
            && active(&self.acceptable_messages).is_none()
            && active(&self.persona).is_none()
            && active(&self.source).is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if let Some(search) = active(&self.phone_number_search) {
            let needle = search.to_lowercase();
            let hit = record
                .text(fields::PHONE_NUMBER)
                .is_some_and(|phone| phone.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(range) = &self.date_range
            && !range.contains(record)
        {
            return false;
        }

        let categorical = [
            (fields::ACTIVITY_TYPE, &self.activity_type),
            (fields::PERSONA, &self.persona),
            (fields::SOURCE, &self.source),
        ];
        for (field, predicate) in categorical {
            if let Some(expected) = active(predicate)
                && record.text(field).as_deref() != Some(expected)
            {
                return false;
            }
        }

        if let Some(expected) = active(&self.acceptable_messages) {
            let matched = record
                .text(fields::ACCEPTABLE_MESSAGES)
                .is_some_and(|value| unescape_quoted(&value) == unescape_quoted(expected));
            if !matched {
                return false;
            }
        }

        true
    }
}

/// Stable filter returning a new list of the matching records.
pub fn filter(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Undo one layer of delimited-text escaping.
///
/// Strips a single pair of wrapping double quotes, then collapses doubled
/// internal quotes.
pub fn unescape_quoted(value: &str) -> String {
    let inner = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    };
    inner.replace("\"\"", "\"")
}

fn active(predicate: &Option<String>) -> Option<&str> {
    predicate.as_deref().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use chrono::NaiveDate;

    fn phone(value: Option<&str>) -> Record {
        let value = value.map(FieldValue::from).unwrap_or(FieldValue::Null);
        Record::from_fields([(fields::PHONE_NUMBER, value)])
    }

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::from_fields([
                (fields::PHONE_NUMBER, FieldValue::from("03001234567")),
                (fields::PERSONA, FieldValue::from("Teacher")),
                (fields::SOURCE, FieldValue::from("Facebook")),
                (fields::ACTIVITY_TYPE, FieldValue::from("watchAndSpeak")),
                (fields::USER_CLICKED_LINK, FieldValue::from("2024-01-05 10:00:00")),
                (fields::ACCEPTABLE_MESSAGES, FieldValue::from("Student \"A\", yes")),
            ]),
            Record::from_fields([
                (fields::PHONE_NUMBER, FieldValue::from("03007654321")),
                (fields::PERSONA, FieldValue::from("Parent")),
                (fields::SOURCE, FieldValue::from("Facebook")),
                (fields::ACTIVITY_TYPE, FieldValue::from("mcqs")),
                (fields::USER_CLICKED_LINK, FieldValue::from("2024-01-12 10:00:00")),
            ]),
            Record::from_fields([
                (fields::PHONE_NUMBER, FieldValue::from("03111234567")),
                (fields::PERSONA, FieldValue::from("Teacher")),
                (fields::SOURCE, FieldValue::from("WhatsApp")),
                (fields::ACTIVITY_TYPE, FieldValue::from("watchAndSpeak")),
                (fields::USER_CLICKED_LINK, FieldValue::from("garbage")),
            ]),
            phone(None),
        ]
    }

    fn phones(records: &[Record]) -> Vec<Option<String>> {
        records.iter().map(|r| r.text(fields::PHONE_NUMBER)).collect()
    }

    #[test]
    fn test_phone_search_scenario() {
        let records = vec![
            phone(Some("03001234567")),
            phone(Some("03007654321")),
            phone(None),
        ];
        let criteria = FilterCriteria {
            phone_number_search: Some("0300123".into()),
            ..Default::default()
        };
        let result = filter(&records, &criteria);
        assert_eq!(phones(&result), vec![Some("03001234567".to_string())]);
    }

    #[test]
    fn test_phone_search_is_case_insensitive() {
        let records = vec![phone(Some("ABC-0300")), phone(Some("xyz"))];
        let criteria = FilterCriteria {
            phone_number_search: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(filter(&records, &criteria).len(), 1);
    }

    #[test]
    fn test_empty_criteria_pass_everything() {
        let records = sample();
        let criteria = FilterCriteria {
            phone_number_search: Some(String::new()),
            persona: Some(String::new()),
            ..Default::default()
        };
        assert!(criteria.is_empty());
        assert_eq!(filter(&records, &criteria), records);
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let records = sample();
        let criteria = FilterCriteria {
            date_range: Some(DateRange::new(
                fields::USER_CLICKED_LINK,
                day(5),
                day(12) + chrono::Duration::hours(10),
            )),
            ..Default::default()
        };
        let result = filter(&records, &criteria);
        assert_eq!(
            phones(&result),
            vec![
                Some("03001234567".to_string()),
                Some("03007654321".to_string())
            ]
        );
    }

    #[test]
    fn test_date_range_excludes_unparsable_and_absent() {
        let records = sample();
        let criteria = FilterCriteria {
            date_range: Some(DateRange::new(fields::USER_CLICKED_LINK, day(1), day(31))),
            ..Default::default()
        };
        let result = filter(&records, &criteria);
        // "garbage" and the record without the column are both dropped
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_categorical_predicates() {
        let records = sample();
        let criteria = FilterCriteria {
            persona: Some("Teacher".into()),
            source: Some("Facebook".into()),
            ..Default::default()
        };
        assert_eq!(
            phones(&filter(&records, &criteria)),
            vec![Some("03001234567".to_string())]
        );

        let criteria = FilterCriteria {
            activity_type: Some("watchAndSpeak".into()),
            ..Default::default()
        };
        assert_eq!(filter(&records, &criteria).len(), 2);
    }

    #[test]
    fn test_categorical_is_exact_match() {
        let records = sample();
        let criteria = FilterCriteria {
            persona: Some("teacher".into()),
            ..Default::default()
        };
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn test_acceptable_messages_normalizes_escaping() {
        let records = sample();
        let escaped = FilterCriteria {
            acceptable_messages: Some("\"Student \"\"A\"\", yes\"".into()),
            ..Default::default()
        };
        let raw = FilterCriteria {
            acceptable_messages: Some("Student \"A\", yes".into()),
            ..Default::default()
        };
        assert_eq!(filter(&records, &escaped).len(), 1);
        assert_eq!(filter(&records, &raw).len(), 1);
    }

    #[test]
    fn test_unescape_quoted() {
        assert_eq!(unescape_quoted("\"Lahore, Punjab\""), "Lahore, Punjab");
        assert_eq!(unescape_quoted("\"Student \"\"A\"\"\""), "Student \"A\"");
        assert_eq!(unescape_quoted("Active"), "Active");
        assert_eq!(unescape_quoted("\""), "\"");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = sample();
        let criteria = FilterCriteria {
            persona: Some("Teacher".into()),
            date_range: Some(DateRange::new(fields::USER_CLICKED_LINK, day(1), day(31))),
            ..Default::default()
        };
        let once = filter(&records, &criteria);
        assert_eq!(filter(&once, &criteria), once);
    }

    #[test]
    fn test_filters_compose() {
        let records = sample();
        let singles = [
            FilterCriteria {
                phone_number_search: Some("0300".into()),
                ..Default::default()
            },
            FilterCriteria {
                date_range: Some(DateRange::new(fields::USER_CLICKED_LINK, day(1), day(10))),
                ..Default::default()
            },
            FilterCriteria {
                activity_type: Some("watchAndSpeak".into()),
                ..Default::default()
            },
            FilterCriteria {
                acceptable_messages: Some("Student \"A\", yes".into()),
                ..Default::default()
            },
            FilterCriteria {
                persona: Some("Teacher".into()),
                ..Default::default()
            },
            FilterCriteria {
                source: Some("Facebook".into()),
                ..Default::default()
            },
        ];

        for a in &singles {
            for b in &singles {
                let combined = FilterCriteria {
                    phone_number_search: a
                        .phone_number_search
                        .clone()
                        .or_else(|| b.phone_number_search.clone()),
                    date_range: a.date_range.clone().or_else(|| b.date_range.clone()),
                    activity_type: a.activity_type.clone().or_else(|| b.activity_type.clone()),
                    acceptable_messages: a
                        .acceptable_messages
                        .clone()
                        .or_else(|| b.acceptable_messages.clone()),
                    persona: a.persona.clone().or_else(|| b.persona.clone()),
                    source: a.source.clone().or_else(|| b.source.clone()),
                };
                assert_eq!(
                    filter(&filter(&records, a), b),
                    filter(&records, &combined)
                );
            }
        }
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let records = sample();
        let before = records.clone();
        let _ = filter(
            &records,
            &FilterCriteria {
                persona: Some("Parent".into()),
                ..Default::default()
            },
        );
        assert_eq!(records, before);
    }
}
