use std::{ffi::OsString, path::PathBuf};

use clap::Parser;
use thiserror::Error;

use crate::types::UploadRequest;

const HELP_FLAG: &str = "-h";

// clap's own help and version flags are off: `-h` is only honoured as the
// first argument and must exit 0 whatever follows it.
#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// The file you want to upload
    #[arg(allow_hyphen_values = true)]
    file: Option<PathBuf>,

    /// Target folder on Google Drive, the home folder when omitted
    #[arg(allow_hyphen_values = true)]
    folder: Option<String>,

    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    rest: Vec<OsString>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Help,
    Upload(UploadRequest),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("no filename provided")]
    NoFilename,
    #[error("too many arguments")]
    TooManyArguments,
    #[error("{0}")]
    Invalid(String),
}

/// Parses the full argument list, program name included.
pub fn parse<I, T>(args: I) -> Result<Parsed, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    if args.get(1).is_some_and(|a| a == HELP_FLAG) {
        return Ok(Parsed::Help);
    }

    // no options are defined: escape everything so a literal `--` stays positional
    let at = args.len().min(1);
    args.insert(at, OsString::from("--"));

    let args = Args::try_parse_from(args).map_err(|e| {
        UsageError::Invalid(e.kind().as_str().unwrap_or("invalid arguments").to_owned())
    })?;

    let file = args.file.ok_or(UsageError::NoFilename)?;
    if !args.rest.is_empty() {
        return Err(UsageError::TooManyArguments);
    }

    Ok(Parsed::Upload(UploadRequest {
        local_file: file,
        target_folder: args.folder.unwrap_or_default(),
    }))
}

pub fn usage() -> String {
    format!(
        "Usage: {} <file> [<target folder>]\nv{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file: &str, folder: &str) -> Parsed {
        Parsed::Upload(UploadRequest {
            local_file: PathBuf::from(file),
            target_folder: folder.to_owned(),
        })
    }

    #[test]
    fn help_flag_wins_regardless_of_other_arguments() {
        assert_eq!(parse(["prog", "-h"]), Ok(Parsed::Help));
        assert_eq!(parse(["prog", "-h", "a", "b", "c"]), Ok(Parsed::Help));
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        assert_eq!(parse(["prog"]), Err(UsageError::NoFilename));
    }

    #[test]
    fn more_than_two_arguments_is_a_usage_error() {
        assert_eq!(
            parse(["prog", "a.txt", "Backups", "extra"]),
            Err(UsageError::TooManyArguments)
        );
        assert_eq!(
            parse(["prog", "a.txt", "Backups", "x", "y"]),
            Err(UsageError::TooManyArguments)
        );
    }

    #[test]
    fn file_only_targets_root() {
        assert_eq!(parse(["prog", "report.pdf"]), Ok(upload("report.pdf", "")));
    }

    #[test]
    fn file_and_folder() {
        assert_eq!(
            parse(["prog", "x.bin", "Backups"]),
            Ok(upload("x.bin", "Backups"))
        );
    }

    #[test]
    fn hyphenated_names_are_positional() {
        assert_eq!(
            parse(["prog", "-notes.txt", "-archive"]),
            Ok(upload("-notes.txt", "-archive"))
        );
    }

    #[test]
    fn double_dash_is_a_name_not_a_separator() {
        assert_eq!(parse(["prog", "a.txt", "--"]), Ok(upload("a.txt", "--")));
        assert_eq!(parse(["prog", "--"]), Ok(upload("--", "")));
        assert_eq!(
            parse(["prog", "--", "a.txt", "Backups"]),
            Err(UsageError::TooManyArguments)
        );
    }

    #[test]
    fn usage_names_arguments_and_version() {
        let u = usage();
        assert!(u.contains("<file> [<target folder>]"));
        assert!(u.contains(env!("CARGO_PKG_VERSION")));
    }
}
