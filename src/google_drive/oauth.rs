use std::{
    future::Future,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use unwrap_or::unwrap_some_or;
use yup_oauth2::{
    authenticator::DefaultAuthenticator, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
};

use crate::settings::Settings;

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Could not read client secret file `{}`", path.display())]
    ClientSecret {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not access credential cache `{}`", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Token request failed")]
    Token(#[from] yup_oauth2::Error),
    #[error("Token response carried no access token")]
    NoAccessToken,
}

pub trait TokenProvider {
    fn access_token(&mut self) -> impl Future<Output = Result<String, AuthError>>;
}

/// Installed-app authorization cached in `credentials.json`.
///
/// The authenticator is only built on first use, so nothing is read from disk
/// for runs that fail before they need a token. Consent happens in the browser
/// and is only asked for when the cache holds no usable token.
pub struct Authorizer {
    credentials_path: PathBuf,
    client_secret_path: PathBuf,
    auth: Option<DefaultAuthenticator>,
}

impl Authorizer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            credentials_path: settings.credentials_path.clone(),
            client_secret_path: settings.client_secret_path.clone(),
            auth: None,
        }
    }

    async fn build(&self) -> Result<DefaultAuthenticator, AuthError> {
        let secret = yup_oauth2::read_application_secret(&self.client_secret_path)
            .await
            .map_err(|source| AuthError::ClientSecret {
                path: self.client_secret_path.clone(),
                source,
            })?;

        private_cache(&self.credentials_path).await?;
        log::debug!("token cache at {}", self.credentials_path.display());

        InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
            .persist_tokens_to_disk(self.credentials_path.clone())
            .build()
            .await
            .map_err(|source| AuthError::Store {
                path: self.credentials_path.clone(),
                source,
            })
    }
}

impl TokenProvider for Authorizer {
    async fn access_token(&mut self) -> Result<String, AuthError> {
        let auth = match self.auth.take() {
            Some(a) => a,
            None => self.build().await?,
        };
        let auth = self.auth.insert(auth);

        let token = auth.token(&[DRIVE_SCOPE]).await?;
        let token = unwrap_some_or!(token.token(), return Err(AuthError::NoAccessToken));

        Ok(token.to_owned())
    }
}

/// Makes sure the token cache is only readable by its owner before any token
/// lands in it. A missing cache is created empty.
async fn private_cache(path: &Path) -> Result<(), AuthError> {
    let store_err = |source| AuthError::Store {
        path: path.to_path_buf(),
        source,
    };

    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    #[cfg(unix)]
    opts.mode(0o600);

    match opts.open(path).await {
        Ok(mut f) => {
            f.write_all(b"[]").await.map_err(store_err)?;
            f.flush().await.map_err(store_err)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => restrict(path).await.map_err(store_err),
        Err(e) => Err(store_err(e)),
    }
}

#[cfg(unix)]
async fn restrict(path: &Path) -> io::Result<()> {
    use std::{fs::Permissions, os::unix::fs::PermissionsExt};

    tokio::fs::set_permissions(path, Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict(_: &Path) -> io::Result<()> {
    Ok(())
}
