use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use log::LevelFilter;

const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
const DEFAULT_CLIENT_SECRET_FILE: &str = "client_secret.json";
const DEFAULT_API_URI: &str = "https://www.googleapis.com/drive/v3";
const DEFAULT_UPLOAD_URI: &str = "https://www.googleapis.com/upload/drive/v3";

const CREDENTIALS_VAR: &str = "DRIVE_UPLOAD_CREDENTIALS";
const CLIENT_SECRET_VAR: &str = "DRIVE_UPLOAD_CLIENT_SECRET";
const API_URI_VAR: &str = "DRIVE_UPLOAD_API_URI";
const UPLOAD_URI_VAR: &str = "DRIVE_UPLOAD_UPLOAD_URI";
const LOG_VAR: &str = "DRIVE_UPLOAD_LOG";

/// Paths and endpoints. Relative paths resolve against the working directory.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials_path: PathBuf,
    pub client_secret_path: PathBuf,
    pub api_uri: String,
    pub upload_uri: String,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            client_secret_path: PathBuf::from(DEFAULT_CLIENT_SECRET_FILE),
            api_uri: DEFAULT_API_URI.to_owned(),
            upload_uri: DEFAULT_UPLOAD_URI.to_owned(),
            log_level: LevelFilter::Warn,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Settings> {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = var(CREDENTIALS_VAR) {
            settings.credentials_path = path.into();
        }
        if let Some(path) = var(CLIENT_SECRET_VAR) {
            settings.client_secret_path = path.into();
        }
        if let Some(uri) = var(API_URI_VAR) {
            settings.api_uri = uri;
        }
        if let Some(uri) = var(UPLOAD_URI_VAR) {
            settings.upload_uri = uri;
        }
        if let Some(level) = var(LOG_VAR) {
            settings.log_level = LevelFilter::from_str(&level)
                .with_context(|| format!("Invalid log level `{level}` in {LOG_VAR}"))?;
        }

        Ok(settings)
    }
}
