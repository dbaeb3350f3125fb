use crate::{Error, Result};

const FOLDER: &str = "application/vnd.google-apps.folder";

/// Parses a `Range: bytes=<start>-<end>` value as sent with a 308.
pub fn parse_range_header(range: &str) -> Result<(u64, u64)> {
    let invalid = || Error::Protocol(format!("invalid range header `{range}`"));

    let (_, r) = range.split_once('=').ok_or_else(invalid)?;
    let (start, end) = r.split_once('-').ok_or_else(invalid)?;

    let start = start.trim().parse::<u64>().map_err(|_| invalid())?;
    let end = end.trim().parse::<u64>().map_err(|_| invalid())?;
    Ok((start, end))
}

/// Query for non-trashed folders named exactly `name`.
pub fn folder_query(name: &str) -> String {
    format!(
        "name='{}' and mimeType='{FOLDER}' and trashed=false",
        escape_query_value(name)
    )
}

fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
