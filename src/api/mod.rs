//! Platform API gateway
//!
//! Wraps the monday.com GraphQL endpoint behind a typed client with an
//! in-memory, time-boxed response cache.

pub mod cache;
pub mod client;

pub use cache::{CacheConfig, QueryCache};
pub use client::{MondayClient, Viewer};
