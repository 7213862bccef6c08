//! To-do style board operations
//!
//! Treats a board as a checklist: items are entries, and an entry counts as
//! done when its status column text says so. Shares the API gateway with the
//! timeline flow.

use crate::api::MondayClient;
use crate::board::{Board, Column, Item};
use crate::{BoardlineError, Result};
use serde_json::Value;
use tracing::info;

/// Status text written when toggling entries
const DONE_LABEL: &str = "Done";
const NOT_STARTED_LABEL: &str = "Not Started";

/// A board item viewed as a checklist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    pub id: String,
    pub name: String,
    pub done: bool,
}

/// Checklist operations on a board
pub struct TodoBoard<'a> {
    client: &'a MondayClient,
}

impl<'a> TodoBoard<'a> {
    pub fn new(client: &'a MondayClient) -> Self {
        Self { client }
    }

    /// Find a board by case-insensitive name match
    pub async fn find_board(&self, name: &str) -> Result<Board> {
        let boards = self.client.boards().await?;
        boards
            .into_iter()
            .find(|board| board.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| BoardlineError::Board(format!("Board \"{}\" not found", name)))
    }

    /// List the board's items as checklist entries
    pub async fn entries(&self, board_id: &str, limit: u32) -> Result<Vec<TodoEntry>> {
        let items = self.client.items_with_columns(board_id, &[], limit).await?;
        Ok(items.into_iter().map(entry_from_item).collect())
    }

    /// Add a new entry, returning it in its initial (not done) state
    pub async fn add(&self, board_id: &str, name: &str) -> Result<TodoEntry> {
        let id = self.client.create_item(board_id, name).await?;
        info!(board = %board_id, item = %id, "todo entry created");
        Ok(TodoEntry {
            id,
            name: name.to_string(),
            done: false,
        })
    }

    /// Flip an entry's completion state via the board's status column
    pub async fn set_done(&self, board_id: &str, item_id: &str, done: bool) -> Result<()> {
        let columns = self.client.board_columns(board_id).await?;
        let status = find_status_column(&columns).ok_or_else(|| {
            BoardlineError::Board(format!("No status column found on board {}", board_id))
        })?;

        let label = if done { DONE_LABEL } else { NOT_STARTED_LABEL };
        self.client
            .change_column_value(
                board_id,
                item_id,
                &status.id,
                &Value::String(label.to_string()),
            )
            .await?;
        Ok(())
    }

    /// Create a plain text column on the board
    pub async fn add_text_column(&self, board_id: &str, title: &str) -> Result<String> {
        self.client.create_column(board_id, title, "text").await
    }
}

/// An entry is done when its status-ish column value reads done/complete
fn entry_from_item(item: Item) -> TodoEntry {
    let done = item
        .column_values
        .iter()
        .find(|value| value.id == "status" || value.id.contains("status"))
        .and_then(|value| value.text.as_deref())
        .map(|text| {
            let text = text.to_lowercase();
            text.contains("done") || text.contains("complete")
        })
        .unwrap_or(false);

    TodoEntry {
        id: item.id,
        name: item.name,
        done,
    }
}

/// The column the toggle writes to: titled like a status, typed like one
fn find_status_column(columns: &[Column]) -> Option<&Column> {
    columns
        .iter()
        .find(|column| column.title.to_lowercase().contains("status") && column.is_status_like())
}
