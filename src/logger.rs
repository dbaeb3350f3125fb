use anyhow::Result;
use log::LevelFilter;
use simple_logger::SimpleLogger;

/// `RUST_LOG` wins over the configured level.
pub fn init(level: LevelFilter) -> Result<()> {
    SimpleLogger::new().with_level(level).env().init()?;

    Ok(())
}
