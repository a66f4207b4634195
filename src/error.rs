use std::path::PathBuf;

use thiserror::Error;

use crate::movie::MovieId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate movie id in seed data: {0}")]
    DuplicateId(MovieId),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
