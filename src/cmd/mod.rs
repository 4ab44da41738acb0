//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module    | Commands handled |
//! |-----------|------------------|
//! | `view`    | `View`           |
//! | `export`  | `Export`         |
//! | `stages`  | `Stages`         |
//! | `config`  | `Config`         |

pub mod config;
pub mod export;
pub mod stages;
pub mod view;

pub use config::cmd_config;
pub use export::cmd_export;
pub use stages::cmd_stages;
pub use view::cmd_view;

use anyhow::{Result, bail};
use std::path::Path;
use tracing::warn;

use funnel::pipeline::{
    DateRange, FilterCriteria, SortConfig, SortDirection, TableSession, is_sortable,
};
use funnel::record::{load_records, parse_timestamp};

use super::{FilterArgs, SortArgs};

/// Turn CLI filter flags into criteria.
///
/// A date range needs all of `--date-column`, `--from` and `--to`; a partial
/// range is ignored with a warning.
pub fn build_criteria(args: &FilterArgs) -> Result<FilterCriteria> {
    let date_range = match (&args.date_column, &args.from, &args.to) {
        (Some(column), Some(from), Some(to)) => {
            let Some(from_at) = parse_timestamp(from) else {
                bail!("Invalid --from date '{}'", from);
            };
            let Some(to_at) = parse_timestamp(to) else {
                bail!("Invalid --to date '{}'", to);
            };
            if from_at > to_at {
                warn!(%from, %to, "date range is empty: --from is after --to");
            }
            Some(DateRange::new(column.clone(), from_at, to_at))
        }
        (None, None, None) => None,
        _ => {
            warn!("ignoring incomplete date range: --date-column, --from and --to are all required");
            None
        }
    };

    Ok(FilterCriteria {
        phone_number_search: args.search.clone(),
        date_range,
        activity_type: args.activity_type.clone(),
        acceptable_messages: args.acceptable_messages.clone(),
        persona: args.persona.clone(),
        source: args.source.clone(),
    })
}

/// Unknown keys are accepted with a warning; records then keep input order.
pub fn build_sort(args: &SortArgs) -> SortConfig {
    let Some(key) = &args.sort else {
        return SortConfig::default();
    };
    if !is_sortable(key) {
        warn!(%key, "not a sortable column, records keep their input order");
    }
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    SortConfig::by(key.clone(), direction)
}

/// Load records and apply filter and sort settings.
pub fn load_session(input: &Path, filters: &FilterArgs, sort: &SortArgs) -> Result<TableSession> {
    let records = load_records(input)?;
    let mut session = TableSession::new(records);
    session.set_criteria(build_criteria(filters)?);
    session.set_sort(build_sort(sort));
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_criteria_full_range() {
        let args = FilterArgs {
            date_column: Some("userClickedLink".into()),
            from: Some("2024-01-01".into()),
            to: Some("2024-01-31 23:59:59".into()),
            persona: Some("Teacher".into()),
            ..Default::default()
        };
        let criteria = build_criteria(&args).unwrap();
        let range = criteria.date_range.unwrap();
        assert_eq!(range.column, "userClickedLink");
        assert!(range.from < range.to);
        assert_eq!(criteria.persona.as_deref(), Some("Teacher"));
    }

    #[test]
    fn test_build_criteria_partial_range_is_ignored() {
        let args = FilterArgs {
            date_column: Some("userClickedLink".into()),
            from: Some("2024-01-01".into()),
            ..Default::default()
        };
        assert!(build_criteria(&args).unwrap().date_range.is_none());
    }

    #[test]
    fn test_build_criteria_rejects_bad_dates() {
        let args = FilterArgs {
            date_column: Some("userClickedLink".into()),
            from: Some("yesterday".into()),
            to: Some("2024-01-31".into()),
            ..Default::default()
        };
        let err = build_criteria(&args).unwrap_err();
        assert!(err.to_string().contains("--from"));
    }

    #[test]
    fn test_build_sort() {
        assert_eq!(build_sort(&SortArgs::default()), SortConfig::default());
        let sort = build_sort(&SortArgs {
            sort: Some("city".into()),
            desc: true,
        });
        assert_eq!(sort, SortConfig::by("city", SortDirection::Desc));
    }

    #[test]
    fn test_build_sort_keeps_unknown_key() {
        let sort = build_sort(&SortArgs {
            sort: Some("favouriteColour".into()),
            desc: false,
        });
        assert_eq!(sort.key.as_deref(), Some("favouriteColour"));
    }
}
