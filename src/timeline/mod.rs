//! Timeline creation
//!
//! Bulk-writes a timeline (date range) column value to every item on a board.
//! The target column is either created fresh or an existing timeline column;
//! per-item dates come from a fixed pair applied to all items or from two
//! existing date columns.

pub mod batch;

pub use batch::{BatchFailure, BatchReport, DEFAULT_CONCURRENCY};

use crate::api::MondayClient;
use crate::board::dates::{self, DatedItem, ItemDates};
use crate::board::Column;
use crate::{BoardlineError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Page limit for the cheap does-the-board-have-items check
const ITEM_CHECK_LIMIT: u32 = 50;

/// Which column receives the timeline values
#[derive(Debug, Clone)]
pub enum ColumnTarget {
    /// Create a new timeline column with this title
    New { title: String },
    /// Write into an existing timeline column
    Existing { column_id: String },
}

/// Where per-item dates come from
#[derive(Debug, Clone)]
pub enum DateSource {
    /// The same range for every item
    Fixed { start: NaiveDate, end: NaiveDate },
    /// Read each item's range from two date columns
    Columns {
        start_column: String,
        end_column: String,
    },
}

#[derive(Debug, Clone)]
pub struct TimelineOptions {
    pub column: ColumnTarget,
    pub dates: DateSource,
    /// Page limit when fetching the items to update
    pub item_limit: u32,
    /// Max in-flight update requests
    pub concurrency: usize,
}

/// Outcome of a timeline run
#[derive(Debug, Clone)]
pub struct TimelineReport {
    pub board_name: String,
    pub column_id: String,
    /// Items fetched for the update
    pub total_items: usize,
    /// Items dropped by date validation
    pub skipped: usize,
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl TimelineReport {
    pub fn updated(&self) -> usize {
        self.succeeded.len()
    }
}

/// The platform's timeline column value: a from/to date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineValue {
    pub from: String,
    pub to: String,
}

impl TimelineValue {
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            from: dates::format_date(start),
            to: dates::format_date(end),
        }
    }
}

/// Runs the whole create-and-fill flow against a board
pub struct TimelineCreator<'a> {
    client: &'a MondayClient,
}

impl<'a> TimelineCreator<'a> {
    pub fn new(client: &'a MondayClient) -> Self {
        Self { client }
    }

    /// Ensure the target column and write a timeline value to every valid
    /// item. Per-item failures land in the report; only setup steps (empty
    /// board, missing column, column creation) fail the run outright.
    pub async fn run(
        &self,
        board_id: &str,
        options: &TimelineOptions,
        progress: impl FnMut(usize, usize),
    ) -> Result<TimelineReport> {
        // The board must have items before any column is created
        let (board_name, items) = self.client.board_items(board_id, ITEM_CHECK_LIMIT).await?;
        if items.is_empty() {
            return Err(BoardlineError::Board(format!(
                "No items found on board \"{}\" (ID: {}). Add some items first or pick another board.",
                board_name, board_id
            )));
        }

        let column_id = self.ensure_column(board_id, &options.column).await?;

        let (dated, fetched) = self.resolve_dates(board_id, options).await?;
        let skipped = fetched - dated.len();

        if dated.is_empty() {
            return Ok(TimelineReport {
                board_name,
                column_id,
                total_items: fetched,
                skipped,
                succeeded: Vec::new(),
                failed: Vec::new(),
            });
        }

        info!(
            board = %board_id,
            column = %column_id,
            items = dated.len(),
            skipped = skipped,
            "starting bulk timeline update"
        );

        let client = self.client;
        let column = column_id.as_str();
        let outcome = batch::run(dated, options.concurrency, progress, move |item| async move {
            let value = serde_json::to_value(TimelineValue::from_dates(item.start, item.end))?;
            client
                .change_column_value(board_id, &item.id, column, &value)
                .await?;
            Ok(())
        })
        .await;

        info!(
            updated = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "bulk timeline update finished"
        );

        Ok(TimelineReport {
            board_name,
            column_id,
            total_items: fetched,
            skipped,
            succeeded: outcome.succeeded,
            failed: outcome.failed,
        })
    }

    async fn ensure_column(&self, board_id: &str, target: &ColumnTarget) -> Result<String> {
        match target {
            ColumnTarget::New { title } => {
                self.client.create_column(board_id, title, "timeline").await
            }
            ColumnTarget::Existing { column_id } => {
                let columns = self.client.board_columns(board_id).await?;
                let column = columns
                    .iter()
                    .find(|column| column.id == *column_id)
                    .ok_or_else(|| {
                        BoardlineError::Board(format!(
                            "Column {} not found on board {}",
                            column_id, board_id
                        ))
                    })?;
                if !column.is_timeline() {
                    return Err(BoardlineError::Board(format!(
                        "Column \"{}\" is not a timeline column",
                        column.title
                    )));
                }
                Ok(column.id.clone())
            }
        }
    }

    /// Produce the validated item list and the fetched-item count
    async fn resolve_dates(
        &self,
        board_id: &str,
        options: &TimelineOptions,
    ) -> Result<(Vec<DatedItem>, usize)> {
        match &options.dates {
            DateSource::Fixed { start, end } => {
                let ids = self.client.item_ids(board_id, options.item_limit).await?;
                let total = ids.len();
                let dated = ids
                    .into_iter()
                    .map(|id| DatedItem {
                        id,
                        start: *start,
                        end: *end,
                    })
                    .collect();
                Ok((dated, total))
            }
            DateSource::Columns {
                start_column,
                end_column,
            } => {
                let items = self
                    .client
                    .items_with_columns(
                        board_id,
                        &[start_column.as_str(), end_column.as_str()],
                        options.item_limit,
                    )
                    .await?;
                let total = items.len();
                let raw = items
                    .into_iter()
                    .map(|item| {
                        let start = item.column_text(start_column).map(str::to_string);
                        let end = item.column_text(end_column).map(str::to_string);
                        ItemDates {
                            id: item.id,
                            start,
                            end,
                        }
                    })
                    .collect();
                Ok((dates::validate_items(raw), total))
            }
        }
    }
}

/// First timeline column on the board, if any
pub fn find_timeline_column(columns: &[Column]) -> Option<&Column> {
    columns.iter().find(|column| column.is_timeline())
}

/// Pick default start/end date columns the way the board picker preselects
/// them: first date column starts, second ends, a lone one does both.
pub fn default_date_columns(columns: &[Column]) -> Option<(&Column, &Column)> {
    let date_columns: Vec<&Column> = columns.iter().filter(|column| column.is_date()).collect();
    match date_columns.as_slice() {
        [] => None,
        [only] => Some((only, only)),
        [first, second, ..] => Some((first, second)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ColumnKind;

    fn column(id: &str, title: &str, kind: ColumnKind) -> Column {
        Column {
            id: id.to_string(),
            title: title.to_string(),
            kind,
        }
    }

    #[test]
    fn test_timeline_value_shape() {
        let value = TimelineValue::from_dates(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        );
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"from":"2026-03-01","to":"2026-03-31"}"#
        );
    }

    #[test]
    fn test_find_timeline_column() {
        let columns = vec![
            column("date4", "Due", ColumnKind::Date),
            column("timeline_1", "Roadmap", ColumnKind::Timeline),
        ];
        assert_eq!(find_timeline_column(&columns).unwrap().id, "timeline_1");
        assert!(find_timeline_column(&columns[..1]).is_none());
    }

    #[test]
    fn test_default_date_columns() {
        let none: Vec<Column> = vec![column("status", "Status", ColumnKind::Status)];
        assert!(default_date_columns(&none).is_none());

        let one = vec![column("date4", "Due", ColumnKind::Date)];
        let (start, end) = default_date_columns(&one).unwrap();
        assert_eq!(start.id, "date4");
        assert_eq!(end.id, "date4");

        let two = vec![
            column("status", "Status", ColumnKind::Status),
            column("date_start", "Kickoff", ColumnKind::Date),
            column("date_end", "Wrap", ColumnKind::Date),
        ];
        let (start, end) = default_date_columns(&two).unwrap();
        assert_eq!(start.id, "date_start");
        assert_eq!(end.id, "date_end");
    }
}
