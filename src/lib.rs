//! mcs - managed settings for Claude, safe across user edits and upgrades.
//!
//! This library provides the core functionality for the `mcs` CLI tool:
//! the settings ownership ledger, the reconciliation policy that decides which
//! keys to add, update, or remove, the writer that applies those decisions to
//! the live settings file, and the per-project bookkeeping around it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod ownership;
pub mod project;
pub mod settings;
pub mod storage;
pub mod version;


/// Library-level error type for mcs operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("KDL error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for mcs operations.
pub type Result<T> = std::result::Result<T, Error>;
