use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single invocation: which local file goes where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub local_file: PathBuf,
    /// Name of the remote folder, empty for the account root.
    pub target_folder: String,
}

impl UploadRequest {
    /// Base name of the local file, used as the remote file name.
    pub fn file_name(&self) -> String {
        match self.local_file.file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => self.local_file.to_string_lossy().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FolderMatch {
    pub id: String,
    pub name: String,
}

/// Body of the create request. `parents` is left out entirely for root uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
}

impl FileMetadata {
    pub fn new(name: String, folder: Option<&FolderMatch>) -> Self {
        Self {
            name,
            parents: folder.map(|f| vec![f.id.clone()]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResult {
    pub id: String,
    pub name: String,
}
