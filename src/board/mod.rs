//! Board domain types
//!
//! Remote entities as the platform returns them: boards, typed columns,
//! items, and per-item column values. Fetched, never mutated locally.

pub mod dates;

use serde::{Deserialize, Serialize};

/// A project's top-level container of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

/// Column types the tool cares about; everything else folds into `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Date,
    Timeline,
    Status,
    Text,
    Dropdown,
    #[serde(other)]
    Other,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Date => "date",
            ColumnKind::Timeline => "timeline",
            ColumnKind::Status => "status",
            ColumnKind::Text => "text",
            ColumnKind::Dropdown => "dropdown",
            ColumnKind::Other => "other",
        }
    }
}

/// A typed field definition on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
}

impl Column {
    pub fn is_date(&self) -> bool {
        self.kind == ColumnKind::Date
    }

    pub fn is_timeline(&self) -> bool {
        self.kind == ColumnKind::Timeline
    }

    /// Status-like columns are what the todo commands toggle
    pub fn is_status_like(&self) -> bool {
        matches!(self.kind, ColumnKind::Status | ColumnKind::Dropdown)
    }
}

/// A single cell payload on an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnValue {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// A row/record on a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

impl Item {
    /// Display text of a column value on this item, if present and non-empty
    pub fn column_text(&self, column_id: &str) -> Option<&str> {
        self.column_values
            .iter()
            .find(|value| value.id == column_id)
            .and_then(|value| value.text.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_parsing() {
        let column: Column = serde_json::from_str(
            r#"{"id":"date4","title":"Due","type":"date"}"#,
        )
        .unwrap();
        assert!(column.is_date());
        assert!(!column.is_timeline());

        let column: Column = serde_json::from_str(
            r#"{"id":"x","title":"Files","type":"file"}"#,
        )
        .unwrap();
        assert_eq!(column.kind, ColumnKind::Other);
    }

    #[test]
    fn test_item_column_text() {
        let item: Item = serde_json::from_str(
            r#"{
                "id": "42",
                "name": "Launch",
                "column_values": [
                    {"id": "date_start", "text": "2026-01-10", "value": null},
                    {"id": "date_end", "text": "", "value": null}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(item.column_text("date_start"), Some("2026-01-10"));
        assert_eq!(item.column_text("date_end"), None);
        assert_eq!(item.column_text("missing"), None);
    }

    #[test]
    fn test_item_without_column_values() {
        let item: Item = serde_json::from_str(r#"{"id":"7"}"#).unwrap();
        assert_eq!(item.id, "7");
        assert!(item.name.is_empty());
        assert!(item.column_values.is_empty());
    }
}
