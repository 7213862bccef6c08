//! Date parsing and per-item validation
//!
//! Items headed for a bulk timeline write carry raw date strings pulled from
//! the platform or typed by the user. Anything missing a date or carrying an
//! unparsable one is dropped here, logged at debug level, and never counts
//! toward the success total.

use chrono::NaiveDate;
use tracing::debug;

/// Raw per-item date strings, as fetched
#[derive(Debug, Clone)]
pub struct ItemDates {
    pub id: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// An item that survived validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedItem {
    pub id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date string in any of the accepted formats
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    // Date columns occasionally carry a full timestamp
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(datetime.date_naive());
    }

    None
}

/// Format a date the way the platform's timeline values expect it
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Keep only items with two parseable dates
pub fn validate_items(items: Vec<ItemDates>) -> Vec<DatedItem> {
    items
        .into_iter()
        .filter_map(|item| {
            let (Some(start_raw), Some(end_raw)) = (item.start.as_deref(), item.end.as_deref())
            else {
                debug!(item = %item.id, "skipping item with missing dates");
                return None;
            };

            match (parse_date(start_raw), parse_date(end_raw)) {
                (Some(start), Some(end)) => Some(DatedItem {
                    id: item.id,
                    start,
                    end,
                }),
                _ => {
                    debug!(
                        item = %item.id,
                        start = %start_raw,
                        end = %end_raw,
                        "skipping item with unparsable dates"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_accepted_formats() {
        assert_eq!(parse_date("2026-03-01"), Some(date(2026, 3, 1)));
        assert_eq!(parse_date("2026/03/01"), Some(date(2026, 3, 1)));
        assert_eq!(parse_date("03/01/2026"), Some(date(2026, 3, 1)));
        assert_eq!(parse_date(" 2026-03-01 "), Some(date(2026, 3, 1)));
        assert_eq!(
            parse_date("2026-03-01T09:30:00+02:00"),
            Some(date(2026, 3, 1))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("2026-13-40"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2026, 3, 1)), "2026-03-01");
    }

    #[test]
    fn test_validation_drops_missing_and_unparsable() {
        let items = vec![
            ItemDates {
                id: "1".to_string(),
                start: Some("2026-01-10".to_string()),
                end: Some("2026-01-20".to_string()),
            },
            ItemDates {
                id: "2".to_string(),
                start: None,
                end: Some("2026-01-20".to_string()),
            },
            ItemDates {
                id: "3".to_string(),
                start: Some("whenever".to_string()),
                end: Some("2026-01-20".to_string()),
            },
            ItemDates {
                id: "4".to_string(),
                start: Some("01/05/2026".to_string()),
                end: Some("2026/01/25".to_string()),
            },
        ];

        let valid = validate_items(items);
        let ids: Vec<&str> = valid.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(valid[1].start, date(2026, 1, 5));
        assert_eq!(valid[1].end, date(2026, 1, 25));
    }
}
