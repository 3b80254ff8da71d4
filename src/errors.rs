// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::script::{CompileError, EvalError};

#[derive(Error, Debug)]
pub enum WrapbarError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// An inline fragment failed to compile; nothing has run yet.
    #[error("inline fragment #{index} failed to compile: {source}\n--- fragment ---\n{fragment}")]
    Compile {
        index: usize,
        fragment: String,
        #[source]
        source: CompileError,
    },

    /// An inline fragment faulted while executing.
    #[error("inline fragment #{index} failed at runtime: {source}")]
    Execution {
        index: usize,
        #[source]
        source: EvalError,
    },

    #[error("failed to spawn '{item}': {source}")]
    Spawn {
        item: String,
        #[source]
        source: std::io::Error,
    },

    #[error("log sink is closed")]
    SinkClosed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WrapbarError>;
