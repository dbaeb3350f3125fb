use std::path::Path;

use async_stream::try_stream;
use futures::{Stream, TryStreamExt};
use reqwest::{header::*, Client};

use super::{
    oauth::TokenProvider,
    types::{DriveFile, ListResponse, Progress, Res, Upload, CHUNK_SIZE},
    utils::folder_query,
};
use crate::{
    settings::Settings,
    types::{FileMetadata, FolderMatch, UploadResult},
    Error, Result,
};

lazy_static::lazy_static! {
    static ref GET_FIELDS: String = DriveFile::fields().join(",");
    static ref LIST_FIELDS: String = format!("nextPageToken,files({})", GET_FIELDS.as_str());
}

pub struct Drive<P> {
    http: Client,
    files_uri: String,
    upload_uri: String,
    chunk_size: u64,
    tokens: P,
}

impl<P: TokenProvider> Drive<P> {
    pub fn new(http: Client, settings: &Settings, tokens: P) -> Self {
        Self {
            http,
            files_uri: format!("{}/files", settings.api_uri.trim_end_matches('/')),
            upload_uri: format!("{}/files", settings.upload_uri.trim_end_matches('/')),
            chunk_size: CHUNK_SIZE,
            tokens,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn tokens(&mut self) -> &mut P {
        &mut self.tokens
    }

    async fn auth_header(&mut self) -> Result<String> {
        Ok(format!("Bearer {}", self.tokens.access_token().await?))
    }

    /// First folder, in listing order, whose name equals `name` exactly.
    pub async fn find_folder(&mut self, name: &str) -> Result<Option<FolderMatch>> {
        let folders = self.list_folders(name);
        futures::pin_mut!(folders);

        while let Some(f) = folders.try_next().await? {
            if f.name == name {
                return Ok(Some(f.into()));
            }
            log::debug!("skipping folder `{}` [{}]", f.name, f.id);
        }

        Ok(None)
    }

    fn list_folders<'a>(&'a mut self, name: &'a str) -> impl Stream<Item = Result<DriveFile>> + 'a {
        let mut next_page_token: Option<String> = None;

        try_stream! {
            loop {
                let res = self.list_page(name, next_page_token.as_deref()).await?;
                log::debug!("folder query for `{name}` returned {} candidates", res.files.len());

                for f in res.files.into_iter() {
                    yield f;
                }

                match res.next_page_token {
                    None => break,
                    Some(t) => next_page_token = Some(t),
                };
            }
        }
    }

    async fn list_page(&mut self, name: &str, page_token: Option<&str>) -> Result<ListResponse> {
        let q = folder_query(name);
        let auth = self.auth_header().await?;
        let req = self.http.get(&self.files_uri).header(AUTHORIZATION, auth);

        let req = match page_token {
            None => req.query(&[
                ("q", q.as_str()),
                ("spaces", "drive"),
                ("fields", LIST_FIELDS.as_str()),
            ]),
            Some(t) => req.query(&[
                ("q", q.as_str()),
                ("spaces", "drive"),
                ("fields", LIST_FIELDS.as_str()),
                ("pageToken", t),
            ]),
        };

        Res::from(req.send().await?).json::<ListResponse>().await
    }

    // nothing is retried; any error ends the upload
    pub async fn upload(&mut self, path: &Path, metadata: &FileMetadata) -> Result<UploadResult> {
        let size = tokio::fs::metadata(path).await?.len();
        let session_uri = self.start_session(metadata, size).await?;
        log::debug!("resumable session for {} bytes at {session_uri}", size);

        let mut upload = Upload::new(session_uri, size, self.chunk_size);
        loop {
            let auth = self.auth_header().await?;
            match upload.send_chunk(&self.http, &auth, path).await? {
                Progress::Partial(sent) => log::debug!("{sent} of {size} bytes uploaded"),
                Progress::Complete(result) => return Ok(result),
            }
        }
    }

    async fn start_session(&mut self, metadata: &FileMetadata, size: u64) -> Result<String> {
        let auth = self.auth_header().await?;
        let res = self
            .http
            .post(&self.upload_uri)
            .query(&[("uploadType", "resumable"), ("fields", GET_FIELDS.as_str())])
            .header(AUTHORIZATION, auth)
            .header("X-Upload-Content-Length", size)
            .json(metadata)
            .send()
            .await?;

        let res = Res::from(res).checked().await?;
        let location = res
            .headers()
            .get(LOCATION)
            .ok_or_else(|| Error::Protocol("resumable session response has no `Location` header".into()))?
            .to_str()
            .map_err(|_| Error::Protocol("non-ascii `Location` header".into()))?
            .to_owned();

        Ok(location)
    }
}
