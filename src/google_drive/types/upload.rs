use std::{io::SeekFrom, path::Path};

use reqwest::{header::*, Body, Client, StatusCode};
use tokio::{
    fs,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tokio_util::io::ReaderStream;

use super::{DriveFile, Res};
use crate::{google_drive::utils::parse_range_header, types::UploadResult, Error, Result};

// 8 MiB, Drive wants chunks in multiples of 256 KiB
pub const CHUNK_SIZE: u64 = (256 * 1024) * 32;

pub struct Upload {
    session_uri: String,
    size: u64,
    sent: u64,
    chunk_size: u64,
}

#[derive(Debug)]
pub enum Progress {
    /// The session holds this many bytes; more are expected.
    Partial(u64),
    Complete(UploadResult),
}

impl Upload {
    pub fn new(session_uri: String, size: u64, chunk_size: u64) -> Upload {
        Self {
            session_uri,
            size,
            sent: 0,
            chunk_size,
        }
    }

    fn content_range(&self, len: u64) -> String {
        match len {
            0 => format!("bytes */{}", self.size),
            _ => format!(
                "bytes {}-{}/{}",
                self.sent,
                self.sent + len - 1,
                self.size
            ),
        }
    }

    pub async fn send_chunk(&mut self, http: &Client, auth: &str, path: &Path) -> Result<Progress> {
        let len = self.chunk_size.min(self.size.saturating_sub(self.sent));

        let mut file = fs::File::open(path).await?;
        file.seek(SeekFrom::Start(self.sent)).await?;
        let body = Body::wrap_stream(ReaderStream::new(file.take(len)));

        let res = http
            .put(&self.session_uri)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_LENGTH, len)
            .header(CONTENT_RANGE, self.content_range(len))
            .body(body)
            .send()
            .await?;

        if res.status() != StatusCode::PERMANENT_REDIRECT {
            let f = Res::from(res).json::<DriveFile>().await?;
            return Ok(Progress::Complete(f.into()));
        }

        let before = self.sent;
        self.sent = match res.headers().get(RANGE) {
            // nothing persisted yet
            None => 0,
            Some(range) => {
                let range = range
                    .to_str()
                    .map_err(|_| Error::Protocol("non-ascii `Range` header".into()))?;
                let (_, end) = parse_range_header(range)?;
                end + 1
            }
        };

        // a 308 to the final request, or one that confirms nothing new, would repeat forever
        if len == 0 || self.sent <= before || self.sent > self.size {
            return Err(Error::Protocol(format!(
                "upload session stalled at byte {} of {}",
                self.sent, self.size
            )));
        }

        Ok(Progress::Partial(self.sent))
    }
}
