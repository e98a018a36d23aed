//! CLI errors

use std::path::PathBuf;
use thiserror::Error;

use vedra_domain::RecordError;
use vedra_editor::{ConfigError, EditorError};
use vedra_rdm_client::HttpError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Repository error: {0}")]
    Http(#[from] HttpError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),

    #[error("Record has {0} blocking validation error(s)")]
    Invalid(usize),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
