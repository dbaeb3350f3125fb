use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::google_drive::AuthError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file {} does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("the folder provided does not exist")]
    FolderNotFound(String),

    #[error("Authorization failed")]
    Auth(#[from] AuthError),

    #[error("GoogleAPIError {status} {body}")]
    Api { status: StatusCode, body: String },

    #[error("Unexpected response from Google Drive: {0}")]
    Protocol(String),

    #[error("Could not reach Google Drive")]
    Http(#[from] reqwest::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Could not decode Google Drive response")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Failures the operator can fix, reported with a worded message instead of a trace.
    pub fn is_expected(&self) -> bool {
        matches!(self, Error::FileNotFound(_) | Error::FolderNotFound(_))
    }
}
