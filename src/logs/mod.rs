pub mod config;

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use config::{LogTarget, LogsConfig};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

pub fn init_logger(dir: &Path, name: &str, cfg: &LogsConfig) -> Result<()> {
    let level: LevelFilter = cfg.level.into();

    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .debug(Color::Magenta);

    let (output, colored): (fern::Output, bool) = match cfg.target {
        LogTarget::Stdout => (io::stdout().into(), io::stdout().is_terminal()),
        LogTarget::Stderr => (io::stderr().into(), io::stderr().is_terminal()),
        LogTarget::File => {
            let path = dir.join(format!("{name}.log"));
            let file = fern::log_file(&path)
                .with_context(|| format!("open log file: {}", path.display()))?;
            (file.into(), false)
        }
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let now = humantime::format_rfc3339_millis(SystemTime::now());
            if colored {
                out.finish(format_args!(
                    "{} [{}] {}",
                    now,
                    colors.color(record.level()),
                    message
                ))
            } else {
                out.finish(format_args!("{} [{}] {}", now, record.level(), message))
            }
        })
        .level(level)
        // actix_server reports every worker start at info
        .level_for("actix_server", LevelFilter::Warn.min(level))
        .chain(output)
        .apply()
        .context("init logger")?;

    Ok(())
}
