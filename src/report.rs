use std::{
    fmt::Display,
    io::{self, Stdout, Write},
    path::Path,
};

use chrono::Local;

use crate::{
    types::{FolderMatch, UploadResult},
    Error,
};

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Operator-facing status lines, each stamped with the local time.
pub struct Reporter<W> {
    out: W,
}

impl Reporter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{} {}", Local::now().format(TIMESTAMP), message)?;
        self.out.flush()
    }

    pub fn upload_started(&mut self, path: &Path) -> io::Result<()> {
        self.line(format_args!("Starting upload of {}", path.display()))
    }

    pub fn auth_started(&mut self) -> io::Result<()> {
        self.line("Authentication started")
    }

    pub fn auth_finished(&mut self) -> io::Result<()> {
        self.line("Authentication finished")
    }

    pub fn target(&mut self, file_name: &str, folder: Option<&FolderMatch>) -> io::Result<()> {
        match folder {
            None => self.line(format_args!("Uploading {file_name} to home folder")),
            Some(f) => self.line(format_args!(
                "Uploading {file_name} to folder {} [{}]",
                f.name, f.id
            )),
        }
    }

    pub fn upload_finished(&mut self) -> io::Result<()> {
        self.line("Upload finished")
    }

    pub fn result(&mut self, result: &UploadResult) -> io::Result<()> {
        self.line(format_args!("File ID: {}", result.id))?;
        self.line(format_args!("File Name: {}", result.name))
    }

    pub fn error(&mut self, error: &Error) -> io::Result<()> {
        self.line(format_args!("ERROR {error}"))
    }
}
