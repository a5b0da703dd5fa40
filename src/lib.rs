//! Read-only HTTP API over a directory of Bible chapter files.
//!
//! Content lives at `{root}/{book}/{chapter}/{language}.json` and is re-read on
//! every request. A SQLite handle is opened at startup and closed at shutdown.

pub mod api;
pub mod config;
pub mod content;
pub mod database;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
