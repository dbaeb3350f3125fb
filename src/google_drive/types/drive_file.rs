use fievar::Fields;
use reqwest::Response;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    types::{FolderMatch, UploadResult},
    Error, Result,
};

#[derive(Debug, Deserialize, Fields)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

impl From<DriveFile> for FolderMatch {
    fn from(file: DriveFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
        }
    }
}

impl From<DriveFile> for UploadResult {
    fn from(file: DriveFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
        }
    }
}

pub struct Res(Response);

impl Res {
    pub async fn checked(self) -> Result<Response> {
        let res = self.0;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await?;
            return Err(Error::Api { status, body });
        }

        Ok(res)
    }

    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.checked().await?.bytes().await?;
        let t = serde_json::from_slice::<T>(&bytes)?;
        Ok(t)
    }
}

impl From<Response> for Res {
    fn from(r: Response) -> Self {
        Self(r)
    }
}
