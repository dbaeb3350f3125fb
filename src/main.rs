use std::process::ExitCode;

use anyhow::{Context, Result};
use drive_upload::{
    app,
    cli::{self, Parsed},
    google_drive::{self, Authorizer, Drive},
    logger,
    report::Reporter,
    settings::Settings,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let request = match cli::parse(std::env::args_os()) {
        Ok(Parsed::Upload(request)) => request,
        Ok(Parsed::Help) => {
            println!("{}", cli::usage());
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            println!("ERROR: {e}");
            println!("{}", cli::usage());
            return Ok(ExitCode::FAILURE);
        }
    };

    let settings = Settings::from_env()?;
    logger::init(settings.log_level)?;

    let http = google_drive::http_client().context("Cannot build the HTTP client")?;
    let mut drive = Drive::new(http, &settings, Authorizer::new(&settings));
    let mut reporter = Reporter::stdout();

    let outcome = app::run(&request, &mut drive, &mut reporter).await;
    app::conclude(outcome, &mut reporter)
}
