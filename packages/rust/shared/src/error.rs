//! Error types for Vitae.
//!
//! Library crates use [`VitaeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Vitae operations.
#[derive(Debug, thiserror::Error)]
pub enum VitaeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A content file could not be parsed as TOML.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Module discovery failed (bad glob pattern, unreadable tree).
    #[error("discovery error: {0}")]
    Discovery(String),

    /// A content module did not yield a valid record (authoring error).
    #[error("invalid {kind} module {module}: {message}")]
    Load {
        kind: String,
        module: String,
        message: String,
    },

    /// Two modules of the same kind declare the same record id.
    #[error("duplicate {kind} id '{id}' in {second} (first declared in {first})")]
    DuplicateId {
        kind: String,
        id: String,
        first: String,
        second: String,
    },

    /// Writing the JSON hand-off failed.
    #[error("export error: {0}")]
    Export(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, VitaeError>;

impl VitaeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error for the content file at `path`.
    pub fn parse(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create an authoring error naming the entity kind and module path.
    pub fn load(kind: impl Into<String>, module: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Load {
            kind: kind.into(),
            module: module.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is an authoring mistake in a content file.
    pub fn is_authoring(&self) -> bool {
        matches!(
            self,
            Self::Load { .. } | Self::DuplicateId { .. } | Self::Parse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = VitaeError::config("missing content root");
        assert_eq!(err.to_string(), "config error: missing content root");

        let err = VitaeError::load("publication", "publications/b.toml", "record id is empty");
        assert_eq!(
            err.to_string(),
            "invalid publication module publications/b.toml: record id is empty"
        );
    }

    #[test]
    fn duplicate_id_names_both_modules() {
        let err = VitaeError::DuplicateId {
            kind: "grant".into(),
            id: "erc-2026".into(),
            first: "grants/a.toml".into(),
            second: "grants/b.toml".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("erc-2026"));
        assert!(msg.contains("grants/a.toml"));
        assert!(msg.contains("grants/b.toml"));
        assert!(err.is_authoring());
    }

    #[test]
    fn config_errors_are_not_authoring_errors() {
        assert!(!VitaeError::config("x").is_authoring());
        assert!(!VitaeError::Export("x".into()).is_authoring());
    }
}
