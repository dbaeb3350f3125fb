mod drive_file;
mod upload;

pub use drive_file::{DriveFile, Res};
pub use upload::{Progress, Upload, CHUNK_SIZE};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub files: Vec<DriveFile>,
}
