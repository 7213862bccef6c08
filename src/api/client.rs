//! monday.com GraphQL client
//!
//! Typed operations over the platform's GraphQL endpoint with a
//! query/set_token/clear_cache surface. Read queries can be served from the
//! owned [`QueryCache`]; every successful mutation clears it.

use crate::api::cache::{CacheConfig, QueryCache};
use crate::board::{Board, Column, Item};
use crate::{BoardlineError, Result};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Per-request timeout for read queries (can return large pages)
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-request timeout for mutations
const WRITE_TIMEOUT: Duration = Duration::from_secs(15);

/// API client for the platform's GraphQL endpoint
pub struct MondayClient {
    client: Client,
    endpoint: String,
    token: String,
    cache: QueryCache,
}

/// GraphQL response wrapper
#[derive(Debug, Clone, Deserialize)]
struct GraphQLResponse {
    data: Option<Value>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct BoardsData {
    boards: Vec<Board>,
}

#[derive(Debug, Clone, Deserialize)]
struct BoardPageData {
    boards: Vec<BoardPage>,
}

#[derive(Debug, Clone, Deserialize)]
struct BoardPage {
    #[serde(default)]
    name: String,
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    items_page: Option<ItemsPage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ItemsPage {
    items: Vec<Item>,
}

#[derive(Debug, Clone, Deserialize)]
struct CreatedId {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateColumnData {
    create_column: CreatedId,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateItemData {
    create_item: CreatedId,
}

#[derive(Debug, Clone, Deserialize)]
struct ChangeColumnValueData {
    change_column_value: CreatedId,
}

/// The authenticated user, from the `me` query
#[derive(Debug, Clone, Deserialize)]
pub struct Viewer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MeData {
    me: Viewer,
}

impl MondayClient {
    /// Create a new client for the given endpoint.
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        cache_config: CacheConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::USER_AGENT,
                    header::HeaderValue::from_static("boardline/0.3"),
                );
                headers
            })
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
            cache: QueryCache::new(cache_config),
        })
    }

    /// Replace the API token used for subsequent requests
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Execute a GraphQL document and unwrap the response envelope
    async fn execute(&self, document: &str, timeout: Duration) -> Result<Value> {
        let body = serde_json::json!({ "query": document });

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, self.token.as_str())
            .json(&body)
            .timeout(timeout)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let result: GraphQLResponse = response.json().await?;
                if let Some(errors) = result.errors {
                    let message = errors
                        .iter()
                        .map(|e| e.message.clone())
                        .collect::<Vec<_>>()
                        .join("; ");
                    return Err(BoardlineError::Api(message));
                }
                result
                    .data
                    .ok_or_else(|| BoardlineError::Api("No data in response".to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BoardlineError::Auth(format!(
                "HTTP {}: check the API token and its permissions",
                response.status().as_u16()
            ))),
            status => {
                let error_body = response.text().await.unwrap_or_default();
                Err(BoardlineError::Api(format!(
                    "HTTP {}: {}",
                    status, error_body
                )))
            }
        }
    }

    /// Run a read query, always hitting the endpoint
    pub async fn query(&self, document: &str) -> Result<Value> {
        debug!(document = %document, "executing query");
        self.execute(document, QUERY_TIMEOUT).await
    }

    /// Run a read query, serving a fresh cached response when one exists
    pub async fn query_cached(&self, document: &str) -> Result<Value> {
        if let Some(data) = self.cache.get(document) {
            debug!("serving query from cache");
            return Ok(data);
        }

        let data = self.execute(document, QUERY_TIMEOUT).await?;
        self.cache.insert(document, data.clone());
        Ok(data)
    }

    /// Run a mutation. A successful write invalidates every cached read.
    pub async fn mutate(&self, document: &str) -> Result<Value> {
        debug!(document = %document, "executing mutation");
        let data = self.execute(document, WRITE_TIMEOUT).await?;
        self.cache.clear();
        Ok(data)
    }

    /// List the boards the token can see
    pub async fn boards(&self) -> Result<Vec<Board>> {
        let data = self.query("query { boards { id name } }").await?;
        let data: BoardsData = serde_json::from_value(data)?;
        Ok(data.boards)
    }

    /// Fetch the column definitions of a board
    pub async fn board_columns(&self, board_id: &str) -> Result<Vec<Column>> {
        let board_id = numeric_id(board_id)?;
        let document = format!(
            "query {{ boards(ids: {board_id}) {{ columns {{ id title type }} }} }}"
        );

        let data = self.query_cached(&document).await?;
        let data: BoardPageData = serde_json::from_value(data)?;
        let board = first_board(data.boards, board_id)?;
        Ok(board.columns)
    }

    /// Fetch a page of items together with the board name
    pub async fn board_items(&self, board_id: &str, limit: u32) -> Result<(String, Vec<Item>)> {
        let board_id = numeric_id(board_id)?;
        let document = format!(
            "query {{ boards(ids: {board_id}) {{ name items_page(limit: {limit}) {{ items {{ id name }} }} }} }}"
        );

        let data = self.query_cached(&document).await?;
        let data: BoardPageData = serde_json::from_value(data)?;
        let board = first_board(data.boards, board_id)?;
        let items = board.items_page.map(|page| page.items).unwrap_or_default();
        Ok((board.name, items))
    }

    /// Fetch item ids only, bypassing the cache (used right before writes)
    pub async fn item_ids(&self, board_id: &str, limit: u32) -> Result<Vec<String>> {
        let board_id = numeric_id(board_id)?;
        let document = format!(
            "query {{ boards(ids: {board_id}) {{ items_page(limit: {limit}) {{ items {{ id }} }} }} }}"
        );

        let data = self.query(&document).await?;
        let data: BoardPageData = serde_json::from_value(data)?;
        let board = first_board(data.boards, board_id)?;
        let items = board.items_page.map(|page| page.items).unwrap_or_default();
        Ok(items.into_iter().map(|item| item.id).collect())
    }

    /// Fetch items with their column values, bypassing the cache.
    ///
    /// An empty `column_ids` slice fetches every column value.
    pub async fn items_with_columns(
        &self,
        board_id: &str,
        column_ids: &[&str],
        limit: u32,
    ) -> Result<Vec<Item>> {
        let board_id = numeric_id(board_id)?;
        let selector = if column_ids.is_empty() {
            "column_values { id text value }".to_string()
        } else {
            let ids = column_ids
                .iter()
                .map(|id| format!("\"{}\"", escape(id)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("column_values(ids: [{ids}]) {{ id text value }}")
        };
        let document = format!(
            "query {{ boards(ids: {board_id}) {{ items_page(limit: {limit}) {{ items {{ id name {selector} }} }} }} }}"
        );

        let data = self.query(&document).await?;
        let data: BoardPageData = serde_json::from_value(data)?;
        let board = first_board(data.boards, board_id)?;
        Ok(board.items_page.map(|page| page.items).unwrap_or_default())
    }

    /// Create a column on a board, returning the new column id
    pub async fn create_column(
        &self,
        board_id: &str,
        title: &str,
        column_type: &str,
    ) -> Result<String> {
        let board_id = numeric_id(board_id)?;
        info!(board = %board_id, title = %title, kind = %column_type, "creating column");

        let document = format!(
            "mutation {{ create_column(board_id: {board_id}, title: \"{}\", column_type: {column_type}) {{ id }} }}",
            escape(title)
        );

        let data = self.mutate(&document).await?;
        let data: CreateColumnData = serde_json::from_value(data)?;
        Ok(data.create_column.id)
    }

    /// Create an item on a board, returning the new item id
    pub async fn create_item(&self, board_id: &str, name: &str) -> Result<String> {
        let board_id = numeric_id(board_id)?;
        info!(board = %board_id, name = %name, "creating item");

        let document = format!(
            "mutation {{ create_item(board_id: {board_id}, item_name: \"{}\", column_values: \"{{}}\") {{ id }} }}",
            escape(name)
        );

        let data = self.mutate(&document).await?;
        let data: CreateItemData = serde_json::from_value(data)?;
        Ok(data.create_item.id)
    }

    /// Write a column value on a single item.
    ///
    /// The value is serialized to JSON and embedded as the GraphQL string
    /// argument the platform expects.
    pub async fn change_column_value(
        &self,
        board_id: &str,
        item_id: &str,
        column_id: &str,
        value: &Value,
    ) -> Result<String> {
        let board_id = numeric_id(board_id)?;
        let item_id = numeric_id(item_id)?;
        let encoded = Value::String(value.to_string()).to_string();

        let document = format!(
            "mutation {{ change_column_value(board_id: {board_id}, item_id: {item_id}, column_id: \"{}\", value: {encoded}) {{ id }} }}",
            escape(column_id)
        );

        let data = self.mutate(&document).await?;
        let data: ChangeColumnValueData = serde_json::from_value(data)?;
        Ok(data.change_column_value.id)
    }

    /// Check the token by asking who it belongs to
    pub async fn me(&self) -> Result<Viewer> {
        let data = self.query("query { me { name email } }").await?;
        let data: MeData = serde_json::from_value(data)?;
        Ok(data.me)
    }
}

/// Board and item ids are embedded unquoted in GraphQL documents, so they
/// must be purely numeric.
fn numeric_id(id: &str) -> Result<&str> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(BoardlineError::Board(format!(
            "Invalid board or item id: {:?}",
            id
        )))
    }
}

fn first_board(boards: Vec<BoardPage>, board_id: &str) -> Result<BoardPage> {
    boards.into_iter().next().ok_or_else(|| {
        BoardlineError::Board(format!(
            "Board {} not found or you don't have access to it",
            board_id
        ))
    })
}

/// Escape a user-supplied string for embedding in a GraphQL string literal
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
