//! `[logging]` section: filter level and the optional JSON log file

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};

/// How often the JSON log file starts afresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    pub fn name(self) -> &'static str {
        match self {
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        }
    }

    fn rotation(self) -> Rotation {
        match self {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Where JSON request and backend logs are written when file output is on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub dir: PathBuf,
    pub rotation: LogRotation,
    /// File name stem, e.g. `events-web.2024-05-01` for daily rotation
    pub prefix: String,
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            rotation: LogRotation::Daily,
            prefix: "events-web".to_string(),
        }
    }
}

impl LogFile {
    /// Rolling appender for this sink; creates the directory if needed
    pub fn appender(&self) -> Result<RollingFileAppender, InitError> {
        RollingFileAppender::builder()
            .rotation(self.rotation.rotation())
            .filename_prefix(self.prefix.clone())
            .build(&self.dir)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level for this crate's own events; `RUST_LOG` replaces the whole filter
    pub level: String,
    /// `None` logs to stdout only
    pub file: Option<LogFile>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    /// Unknown values fail the parse rather than fall back
    pub file_rotation: Option<LogRotation>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Resolve the section, rejecting levels `tracing` doesn't know
    pub fn from_file(file: Option<FileLogging>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let level = match file.level {
            Some(level) => level
                .parse::<tracing::Level>()
                .map(|parsed| parsed.to_string().to_lowercase())
                .map_err(|_| {
                    anyhow!(
                        "Invalid [logging] level '{}' (use trace, debug, info, warn or error)",
                        level
                    )
                })?,
            None => Self::default().level,
        };

        let sink = file.file_enabled.unwrap_or(false).then(|| {
            let defaults = LogFile::default();
            LogFile {
                dir: file.file_dir.map(PathBuf::from).unwrap_or(defaults.dir),
                rotation: file.file_rotation.unwrap_or(defaults.rotation),
                prefix: file.file_prefix.unwrap_or(defaults.prefix),
            }
        });

        Ok(Self { level, file: sink })
    }
}
