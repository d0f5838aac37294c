use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading an inventory or building its graph.
#[derive(Error, Debug)]
pub enum TpologyError {
    #[error("resource kind is a reserved word: {kind}")]
    ReservedKind { kind: String },

    #[error("{message}{}", path_suffix(.path))]
    Shape {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("decode error: {message}{}", path_suffix(.path))]
    Decode {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("dangling reference in {kind}/{name} at {path}: no {key} named '{target}'")]
    DanglingReference {
        kind: String,
        name: String,
        key: String,
        target: String,
        path: String,
    },

    #[error("duplicate resource {kind}/{name} (first: {first}, second: {second})")]
    DuplicateResource {
        kind: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("no resource named '{name}' (expected kind/name)")]
    UnknownResource { name: String },

    #[error("inventory path not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("git error: {message} (repository: {url})")]
    Git { message: String, url: String },

    #[error("render error: {message}")]
    Render { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl TpologyError {
    /// Attaches a manifest path to shape and decode errors that lack one.
    pub fn with_path(self, source: &std::path::Path) -> Self {
        match self {
            TpologyError::Shape { message, path: None } => TpologyError::Shape {
                message,
                path: Some(source.to_path_buf()),
            },
            TpologyError::Decode { message, path: None } => TpologyError::Decode {
                message,
                path: Some(source.to_path_buf()),
            },
            other => other,
        }
    }
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" (path: {})", p.display()),
        None => String::new(),
    }
}

/// Convenience alias for results using `TpologyError`.
pub type Result<T> = std::result::Result<T, TpologyError>;
