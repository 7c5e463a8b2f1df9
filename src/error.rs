//! Error types shared by the migration engine.
//!
//! Command handlers wrap these in `anyhow` with context; the library returns
//! them directly so callers can tell a skippable I/O failure from a parse
//! failure that must abort the run.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CodemodError {
    /// Reading or writing a file failed. The walker logs these and moves on.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TypeScript source could not be parsed, so it cannot be rewritten safely.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A migration config file or option is malformed.
    #[error("invalid migration config: {0}")]
    Config(String),

    #[error("unknown migration module '{0}'")]
    UnknownModule(String),

    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

impl CodemodError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodemodError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the walker may skip the offending file and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CodemodError::Io { .. })
    }
}

pub type Result<T, E = CodemodError> = std::result::Result<T, E>;
