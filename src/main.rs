//! boardline CLI entry point

use boardline::api::{CacheConfig, MondayClient};
use boardline::board::dates;
use boardline::config::Config;
use boardline::timeline::{
    self, ColumnTarget, DateSource, TimelineCreator, TimelineOptions,
};
use boardline::todo::TodoBoard;
use boardline::BoardlineError;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::io::{Read, Write};
use std::process;
use std::time::Duration;

/// boardline - bulk timeline writer for monday.com boards
#[derive(Parser, Debug)]
#[command(name = "boardline")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/boardline/config.yaml)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the boards this token can see
    Boards,

    /// List the columns of a board
    Columns {
        /// Board ID
        board: String,
    },

    /// List the items of a board
    Items {
        /// Board ID
        board: String,

        /// Page limit
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Write a timeline value to every item on a board
    Timeline {
        /// Board ID (interactive picker when omitted)
        board: Option<String>,

        /// Title for a newly created timeline column
        #[arg(long, default_value = "Project Timeline")]
        title: String,

        /// Write into this existing timeline column instead of creating one
        #[arg(long)]
        column: Option<String>,

        /// Fixed start date (YYYY-MM-DD) applied to every item
        #[arg(long)]
        start: Option<String>,

        /// Fixed end date (YYYY-MM-DD) applied to every item
        #[arg(long)]
        end: Option<String>,

        /// Read per-item start dates from this date column
        #[arg(long)]
        start_column: Option<String>,

        /// Read per-item end dates from this date column
        #[arg(long)]
        end_column: Option<String>,

        /// Max in-flight update requests
        #[arg(long)]
        concurrency: Option<usize>,

        /// Item page limit
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Run a raw GraphQL document and print the JSON response
    Query {
        /// The document (read from stdin when omitted)
        document: Option<String>,

        /// Serve from the response cache when possible
        #[arg(long)]
        cached: bool,
    },

    /// Check the API token (runs the `me` query)
    Whoami,

    /// Checklist commands on a board
    #[command(subcommand)]
    Todo(TodoCommands),
}

#[derive(Subcommand, Debug)]
enum TodoCommands {
    /// List entries with their completion state
    List {
        /// Board name or ID (falls back to todo_board in config)
        #[arg(short, long)]
        board: Option<String>,
    },

    /// Add a new entry
    Add {
        /// Entry name
        name: String,

        #[arg(short, long)]
        board: Option<String>,
    },

    /// Mark an entry done
    Done {
        /// Item ID
        item: String,

        #[arg(short, long)]
        board: Option<String>,
    },

    /// Mark an entry not started
    Reopen {
        /// Item ID
        item: String,

        #[arg(short, long)]
        board: Option<String>,
    },

    /// Create a text column on the board
    AddColumn {
        /// Column title
        title: String,

        #[arg(short, long)]
        board: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = boardline::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> boardline::Result<()> {
    let config = match cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    let token = config.resolve_token()?;

    let client = MondayClient::new(
        &config.api_url,
        token,
        CacheConfig {
            ttl: Duration::from_secs(config.cache_ttl_secs),
            capacity: config.cache_capacity,
        },
    )?;

    match cli.command {
        Commands::Boards => {
            let boards = client.boards().await?;
            if boards.is_empty() {
                println!("No boards found.");
            }
            for board in boards {
                println!("{:<14} {}", board.id, board.name);
            }
        }

        Commands::Columns { board } => {
            let columns = client.board_columns(&board).await?;
            for column in &columns {
                println!(
                    "{:<24} {:<10} {}",
                    column.id,
                    column.kind.as_str(),
                    column.title
                );
            }
            if let Some(existing) = timeline::find_timeline_column(&columns) {
                println!("\nExisting timeline column: {} ({})", existing.title, existing.id);
            }
        }

        Commands::Items { board, limit } => {
            let (name, items) = client
                .board_items(&board, limit.unwrap_or(config.item_limit))
                .await?;
            println!("{} item(s) on \"{}\":", items.len(), name);
            for item in items {
                println!("{:<14} {}", item.id, item.name);
            }
        }

        Commands::Timeline {
            board,
            title,
            column,
            start,
            end,
            start_column,
            end_column,
            concurrency,
            limit,
        } => {
            let board_id = match board {
                Some(id) => id,
                None => pick_board(&client).await?,
            };

            let target = match column {
                Some(column_id) => ColumnTarget::Existing { column_id },
                None => ColumnTarget::New { title },
            };

            let date_source =
                resolve_date_source(&client, &board_id, start, end, start_column, end_column)
                    .await?;

            let options = TimelineOptions {
                column: target,
                dates: date_source,
                item_limit: limit.unwrap_or(config.item_limit),
                concurrency: concurrency.unwrap_or(config.batch_concurrency),
            };

            let creator = TimelineCreator::new(&client);
            let report = creator
                .run(&board_id, &options, |completed, total| {
                    print!("\rProcessed {} of {} items...", completed, total);
                    let _ = std::io::stdout().flush();
                })
                .await?;
            println!();

            for failure in &report.failed {
                eprintln!("  item {} failed: {}", failure.item_id, failure.error);
            }
            if report.skipped > 0 {
                println!(
                    "Skipped {} item(s) without two parseable dates.",
                    report.skipped
                );
            }

            if report.updated() > 0 {
                println!(
                    "Successfully updated timeline for {} of {} items on \"{}\" (column {}).",
                    report.updated(),
                    report.total_items,
                    report.board_name,
                    report.column_id
                );
            } else {
                return Err(BoardlineError::Board(
                    "No items were updated. Check that your date formats are valid.".to_string(),
                ));
            }
        }

        Commands::Query { document, cached } => {
            let document = match document {
                Some(document) => document,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let document = document.trim();
            if document.is_empty() {
                return Err(BoardlineError::Config("Empty query document".to_string()));
            }

            let data = if cached {
                client.query_cached(document).await?
            } else {
                client.query(document).await?
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Whoami => {
            let viewer = client.me().await?;
            match viewer.email {
                Some(email) => println!("{} <{}>", viewer.name, email),
                None => println!("{}", viewer.name),
            }
        }

        Commands::Todo(todo_command) => {
            handle_todo(&client, &config, todo_command).await?;
        }
    }

    Ok(())
}

async fn handle_todo(
    client: &MondayClient,
    config: &Config,
    command: TodoCommands,
) -> boardline::Result<()> {
    let todo = TodoBoard::new(client);

    match command {
        TodoCommands::List { board } => {
            let board_id = resolve_todo_board(client, config, board).await?;
            let entries = todo.entries(&board_id, config.item_limit).await?;
            if entries.is_empty() {
                println!("No entries.");
            }
            for entry in entries {
                let mark = if entry.done { "x" } else { " " };
                println!("[{}] {:<14} {}", mark, entry.id, entry.name);
            }
        }

        TodoCommands::Add { name, board } => {
            let board_id = resolve_todo_board(client, config, board).await?;
            let entry = todo.add(&board_id, &name).await?;
            println!("Created entry {} ({}).", entry.name, entry.id);
        }

        TodoCommands::Done { item, board } => {
            let board_id = resolve_todo_board(client, config, board).await?;
            todo.set_done(&board_id, &item, true).await?;
            println!("Marked {} done.", item);
        }

        TodoCommands::Reopen { item, board } => {
            let board_id = resolve_todo_board(client, config, board).await?;
            todo.set_done(&board_id, &item, false).await?;
            println!("Marked {} not started.", item);
        }

        TodoCommands::AddColumn { title, board } => {
            let board_id = resolve_todo_board(client, config, board).await?;
            let column_id = todo.add_text_column(&board_id, &title).await?;
            println!("Created column \"{}\" ({}).", title, column_id);
        }
    }

    Ok(())
}

/// Board name or ID from the flag or config; names are resolved remotely
async fn resolve_todo_board(
    client: &MondayClient,
    config: &Config,
    board: Option<String>,
) -> boardline::Result<String> {
    let Some(name_or_id) = board.or_else(|| config.todo_board.clone()) else {
        return Err(BoardlineError::Config(
            "No todo board set. Pass --board or set todo_board in the config file.".to_string(),
        ));
    };

    if !name_or_id.is_empty() && name_or_id.chars().all(|c| c.is_ascii_digit()) {
        Ok(name_or_id)
    } else {
        Ok(TodoBoard::new(client).find_board(&name_or_id).await?.id)
    }
}

async fn pick_board(client: &MondayClient) -> boardline::Result<String> {
    let boards = client.boards().await?;
    if boards.is_empty() {
        return Err(BoardlineError::Board(
            "No boards available for this token".to_string(),
        ));
    }

    let labels: Vec<String> = boards
        .iter()
        .map(|board| format!("{} ({})", board.name, board.id))
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a board")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| BoardlineError::Other(format!("Prompt failed: {}", e)))?;

    Ok(boards[selection].id.clone())
}

/// Turn the date flags (or interactive answers) into a DateSource
async fn resolve_date_source(
    client: &MondayClient,
    board_id: &str,
    start: Option<String>,
    end: Option<String>,
    start_column: Option<String>,
    end_column: Option<String>,
) -> boardline::Result<DateSource> {
    match (start_column, end_column) {
        (Some(start_column), Some(end_column)) => {
            return Ok(DateSource::Columns {
                start_column,
                end_column,
            });
        }
        (None, None) => {}
        _ => {
            return Err(BoardlineError::Config(
                "--start-column and --end-column must be given together".to_string(),
            ));
        }
    }

    match (start, end) {
        (Some(start), Some(end)) => Ok(DateSource::Fixed {
            start: parse_cli_date(&start)?,
            end: parse_cli_date(&end)?,
        }),
        (None, None) => prompt_date_source(client, board_id).await,
        _ => Err(BoardlineError::Config(
            "--start and --end must be given together".to_string(),
        )),
    }
}

/// Interactive fallback: same dates for all items, or two date columns
async fn prompt_date_source(
    client: &MondayClient,
    board_id: &str,
) -> boardline::Result<DateSource> {
    let columns = client.board_columns(board_id).await?;
    let date_columns: Vec<_> = columns.iter().filter(|column| column.is_date()).collect();

    let use_columns = if date_columns.is_empty() {
        false
    } else {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Where do the dates come from?")
            .items(&[
                "Use the same dates for all items",
                "Use dates from existing date columns",
            ])
            .default(0)
            .interact()
            .map_err(|e| BoardlineError::Other(format!("Prompt failed: {}", e)))?;
        choice == 1
    };

    if use_columns {
        let labels: Vec<String> = date_columns
            .iter()
            .map(|column| format!("{} ({})", column.title, column.id))
            .collect();
        let (default_start, default_end) = timeline::default_date_columns(&columns)
            .map(|(start, end)| {
                let start_index = date_columns.iter().position(|c| c.id == start.id);
                let end_index = date_columns.iter().position(|c| c.id == end.id);
                (start_index.unwrap_or(0), end_index.unwrap_or(0))
            })
            .unwrap_or((0, 0));

        let start = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Start date column")
            .items(&labels)
            .default(default_start)
            .interact()
            .map_err(|e| BoardlineError::Other(format!("Prompt failed: {}", e)))?;
        let end = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("End date column")
            .items(&labels)
            .default(default_end)
            .interact()
            .map_err(|e| BoardlineError::Other(format!("Prompt failed: {}", e)))?;

        Ok(DateSource::Columns {
            start_column: date_columns[start].id.clone(),
            end_column: date_columns[end].id.clone(),
        })
    } else {
        Ok(DateSource::Fixed {
            start: prompt_date("Start date (YYYY-MM-DD)")?,
            end: prompt_date("End date (YYYY-MM-DD)")?,
        })
    }
}

fn prompt_date(prompt: &str) -> boardline::Result<NaiveDate> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| BoardlineError::Other(format!("Prompt failed: {}", e)))?;
    parse_cli_date(&input)
}

fn parse_cli_date(s: &str) -> boardline::Result<NaiveDate> {
    dates::parse_date(s).ok_or_else(|| {
        BoardlineError::InvalidDate(format!("{:?} (expected YYYY-MM-DD)", s))
    })
}
