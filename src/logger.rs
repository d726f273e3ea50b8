use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

use crate::domain::utils::statistics::ANALYTICS_TARGET;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "decision_engine.log";
const ANALYTICS_FILE: &str = "analytics.log";

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Overrides `RUST_LOG` when set.
    pub level: Option<LevelFilter>,
    pub log_dir: PathBuf,
    pub to_console: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { level: None, log_dir: PathBuf::from(LOG_DIR), to_console: true }
    }
}

impl LoggerConfig {
    fn level_filter(&self) -> LevelFilter {
        self.level.unwrap_or_else(|| std::env::var("RUST_LOG").ok().and_then(|level| level.parse::<LevelFilter>().ok()).unwrap_or(LevelFilter::Info))
    }
}

/// Initializes the global logger.
///
/// Should be called once at the start of `main`. Diagnostics go to stderr (colored) and to
/// `<log_dir>/decision_engine.log`; decision records on the analytics target go to
/// `<log_dir>/analytics.log` only.
pub fn init(config: LoggerConfig) -> Result<(), fern::InitError> {
    fs::create_dir_all(&config.log_dir)?;
    let log_file_path = config.log_dir.join(LOG_FILE);
    let analytics_file_path = config.log_dir.join(ANALYTICS_FILE);

    let base_config = Dispatch::new().level(config.level_filter()).level_for("serde", LevelFilter::Warn).level_for("uuid", LevelFilter::Warn);

    let colors = fern::colors::ColoredLevelConfig::new()
        .error(fern::colors::Color::Red)
        .warn(fern::colors::Color::Yellow)
        .info(fern::colors::Color::Green)
        .debug(fern::colors::Color::Blue)
        .trace(fern::colors::Color::BrightBlack);

    let console_config = Dispatch::new()
        .filter(|metadata| metadata.target() != ANALYTICS_TARGET)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let file_config = Dispatch::new()
        .filter(|metadata| metadata.target() != ANALYTICS_TARGET)
        .format(|out, message, record| {
            out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.target(), message))
        })
        .chain(fern::log_file(&log_file_path)?);

    let analytics_config = Dispatch::new()
        .filter(|metadata| metadata.target() == ANALYTICS_TARGET)
        .format(|out, message, _record| out.finish(format_args!("{} {}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"), message)))
        .chain(fern::log_file(&analytics_file_path)?);

    let mut dispatch = base_config.chain(file_config).chain(analytics_config);
    if config.to_console {
        dispatch = dispatch.chain(console_config);
    }
    dispatch.apply()?;

    log::info!("Logger initialized. Logging to '{}'.", log_file_path.display());
    Ok(())
}
