pub mod app;
pub mod cli;
mod error;
pub mod google_drive;
pub mod logger;
pub mod report;
pub mod settings;
pub mod types;

pub use error::{Error, Result};
