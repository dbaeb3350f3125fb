use std::{io::Write, process::ExitCode};

use crate::{
    google_drive::{Drive, TokenProvider},
    report::Reporter,
    types::{FileMetadata, UploadRequest, UploadResult},
    Error, Result,
};

/// One upload, start to finish: authenticate, resolve the target folder,
/// upload, report. Nothing is sent to Drive for a missing local file or an
/// unknown folder.
pub async fn run<P, W>(
    request: &UploadRequest,
    drive: &mut Drive<P>,
    reporter: &mut Reporter<W>,
) -> Result<UploadResult>
where
    P: TokenProvider,
    W: Write,
{
    if !request.local_file.exists() {
        return Err(Error::FileNotFound(request.local_file.clone()));
    }

    reporter.upload_started(&request.local_file)?;

    reporter.auth_started()?;
    drive.tokens().access_token().await?;
    reporter.auth_finished()?;

    let folder = match request.target_folder.as_str() {
        "" => None,
        name => match drive.find_folder(name).await? {
            Some(f) => Some(f),
            None => return Err(Error::FolderNotFound(name.to_owned())),
        },
    };

    let metadata = FileMetadata::new(request.file_name(), folder.as_ref());
    reporter.target(&metadata.name, folder.as_ref())?;

    let result = drive.upload(&request.local_file, &metadata).await?;
    reporter.upload_finished()?;
    reporter.result(&result)?;

    Ok(result)
}

/// Maps the outcome of [`run`] to an exit status. Expected failures are
/// reported and exit 1; anything else is handed back to `main`.
pub fn conclude<W: Write>(
    outcome: Result<UploadResult>,
    reporter: &mut Reporter<W>,
) -> anyhow::Result<ExitCode> {
    match outcome {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_expected() => {
            reporter.error(&e)?;
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mockito::{Matcher, Mock, Server, ServerGuard};
    use reqwest::Client;
    use serde_json::json;
    use tempdir::TempDir;

    use super::*;
    use crate::{google_drive::AuthError, settings::Settings};

    #[derive(Default)]
    struct CountingToken {
        calls: usize,
    }

    impl TokenProvider for CountingToken {
        async fn access_token(&mut self) -> Result<String, AuthError> {
            self.calls += 1;
            Ok("test-token".into())
        }
    }

    fn drive(server: &ServerGuard) -> Drive<CountingToken> {
        let settings = Settings {
            api_uri: server.url(),
            upload_uri: format!("{}/upload", server.url()),
            ..Settings::default()
        };
        Drive::new(Client::new(), &settings, CountingToken::default())
    }

    async fn local_file(dir: &TempDir, name: &str) -> anyhow::Result<PathBuf> {
        let path = dir.path().join(name);
        tokio::fs::write(&path, b"%PDF-1.4 not really").await?;
        Ok(path)
    }

    async fn folder_query(server: &mut ServerGuard, files: serde_json::Value) -> Mock {
        server
            .mock("GET", "/files")
            .match_query(Matcher::Any)
            .with_body(json!({ "files": files }).to_string())
            .create_async()
            .await
    }

    async fn upload_session(server: &mut ServerGuard, metadata: serde_json::Value) -> Mock {
        let session = format!("{}/session/1", server.url());
        server
            .mock("POST", "/upload/files")
            .match_query(Matcher::UrlEncoded("uploadType".into(), "resumable".into()))
            .match_body(Matcher::Json(metadata))
            .with_header("location", &session)
            .create_async()
            .await
    }

    async fn upload_content(server: &mut ServerGuard, id: &str, name: &str) -> Mock {
        server
            .mock("PUT", "/session/1")
            .with_body(json!({ "id": id, "name": name }).to_string())
            .create_async()
            .await
    }

    fn output(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn root_upload_sends_no_parents() -> anyhow::Result<()> {
        let dir = TempDir::new("app")?;
        let path = local_file(&dir, "report.pdf").await?;

        let mut server = Server::new_async().await;
        let query = server
            .mock("GET", "/files")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let session = upload_session(&mut server, json!({ "name": "report.pdf" })).await;
        let content = upload_content(&mut server, "abc123", "report.pdf").await;

        let request = UploadRequest {
            local_file: path,
            target_folder: String::new(),
        };
        let mut reporter = Reporter::new(Vec::new());
        let result = run(&request, &mut drive(&server), &mut reporter).await?;

        query.assert_async().await;
        session.assert_async().await;
        content.assert_async().await;
        assert_eq!(result.name, "report.pdf");

        let out = output(reporter);
        assert!(out.contains("Authentication started"));
        assert!(out.contains("Authentication finished"));
        assert!(out.contains("Uploading report.pdf to home folder"));
        assert!(out.contains("Upload finished"));
        assert!(out.contains("File ID: abc123"));
        assert!(out.contains("File Name: report.pdf"));
        Ok(())
    }

    #[tokio::test]
    async fn named_folder_becomes_the_parent() -> anyhow::Result<()> {
        let dir = TempDir::new("app")?;
        let path = local_file(&dir, "x.bin").await?;

        let mut server = Server::new_async().await;
        let _query = folder_query(
            &mut server,
            json!([{ "id": "F7", "name": "Backups-2023" }, { "id": "F1", "name": "Backups" }]),
        )
        .await;
        let session = upload_session(&mut server, json!({ "name": "x.bin", "parents": ["F1"] })).await;
        let _content = upload_content(&mut server, "x1", "x.bin").await;

        let request = UploadRequest {
            local_file: path,
            target_folder: "Backups".into(),
        };
        let mut reporter = Reporter::new(Vec::new());
        run(&request, &mut drive(&server), &mut reporter).await?;

        session.assert_async().await;
        assert!(output(reporter).contains("Uploading x.bin to folder Backups [F1]"));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_folder_stops_before_uploading() -> anyhow::Result<()> {
        let dir = TempDir::new("app")?;
        let path = local_file(&dir, "x.bin").await?;

        let mut server = Server::new_async().await;
        let _query = folder_query(&mut server, json!([{ "id": "F7", "name": "backups" }])).await;
        let session = server
            .mock("POST", "/upload/files")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let request = UploadRequest {
            local_file: path,
            target_folder: "Backups".into(),
        };
        let mut reporter = Reporter::new(Vec::new());
        let outcome = run(&request, &mut drive(&server), &mut reporter).await;

        session.assert_async().await;
        assert!(matches!(outcome, Err(Error::FolderNotFound(ref n)) if n == "Backups"));

        let code = conclude(outcome, &mut reporter)?;
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
        assert!(output(reporter).contains("ERROR the folder provided does not exist"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_fails_without_authenticating() -> anyhow::Result<()> {
        let server = Server::new_async().await;
        let mut drive = drive(&server);

        let request = UploadRequest {
            local_file: PathBuf::from("/nonexistent/report.pdf"),
            target_folder: String::new(),
        };
        let mut reporter = Reporter::new(Vec::new());
        let outcome = run(&request, &mut drive, &mut reporter).await;

        assert!(matches!(outcome, Err(Error::FileNotFound(_))));
        assert_eq!(drive.tokens().calls, 0);

        let code = conclude(outcome, &mut reporter)?;
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
        assert!(output(reporter).contains("ERROR file /nonexistent/report.pdf does not exist"));
        Ok(())
    }

    #[tokio::test]
    async fn transport_failures_propagate() -> anyhow::Result<()> {
        let dir = TempDir::new("app")?;
        let path = local_file(&dir, "x.bin").await?;

        let mut server = Server::new_async().await;
        let _session = server
            .mock("POST", "/upload/files")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let request = UploadRequest {
            local_file: path,
            target_folder: String::new(),
        };
        let mut reporter = Reporter::new(Vec::new());
        let outcome = run(&request, &mut drive(&server), &mut reporter).await;

        assert!(matches!(outcome, Err(Error::Api { .. })));
        assert!(conclude(outcome, &mut reporter).is_err());
        Ok(())
    }
}
