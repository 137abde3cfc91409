use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("missing required column `{column}` in {}", .path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("failed to parse {}{}: {message}", .path.display(), at_line(.line))]
    Parse {
        path: PathBuf,
        line: Option<u64>,
        message: String,
    },

    #[error("unsupported embedding model `{0}`")]
    UnsupportedModel(String),

    #[error("failed to load embedding model {model}: {message}")]
    ModelLoad { model: String, message: String },

    #[error("embedding failed for row {row}: {message}")]
    Embed { row: usize, message: String },

    #[error("embedding dimensions mismatch for row {row}: expected {expected}, got {actual}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
