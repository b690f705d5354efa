use std::fs::{self, OpenOptions};

use anyhow::Context;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Config;

/// Sends the `log` output to the configured file.
///
/// Children own the terminal, so nothing is logged there. Does nothing when
/// logging is off or no log file could be determined.
pub fn init(config: &Config) -> anyhow::Result<()> {
    if config.log_level == LevelFilter::Off {
        return Ok(());
    }
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let log_config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();
    WriteLogger::init(config.log_level, log_config, file).context("logger already set")?;
    Ok(())
}
