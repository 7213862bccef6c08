//! boardline - Bulk timeline writer and board toolkit for monday.com
//!
//! boardline talks to the platform's GraphQL API to put a timeline (date
//! range) column on every item of a board in one go, with dates either fixed
//! or pulled from existing date columns. It also ships a raw query runner and
//! a small checklist mode built on the same board/item operations.
//!
//! # Architecture
//!
//! - **api**: GraphQL gateway (typed client + time-boxed response cache)
//! - **board**: domain types (Board, Column, Item) and date validation
//! - **timeline**: the create-and-fill flow and its bounded batch updater
//! - **todo**: checklist operations on a board
//! - **config**: optional yaml config and token resolution

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod logging;
pub mod timeline;
pub mod todo;

pub use error::{BoardlineError, Result};
