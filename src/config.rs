use crate::model::NoticeTime;
use anyhow::Context;
use std::env;
use std::path::PathBuf;

/// Runtime configuration shared by the CLI and an embedding transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Notice time for participants without a personal override.
    pub default_notice: NoticeTime,
    /// IANA timezone identifier; all reminder arithmetic is local
    /// wall-clock in this zone. The library takes the clock injected by
    /// the caller, so conversion stays outside it.
    pub timezone: String,
    pub data_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_notice: NoticeTime::default(),
            timezone: "Europe/Kyiv".to_string(),
            data_file: PathBuf::from("data.json"),
        }
    }
}

impl Config {
    /// Read overrides from `DUTYROTA_NOTICE` (HH:MM), `DUTYROTA_TZ` and
    /// `DUTYROTA_DATA`; anything unset keeps its default.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = env::var("DUTYROTA_NOTICE") {
            config.default_notice = NoticeTime::parse(&raw)
                .map_err(anyhow::Error::msg)
                .context("DUTYROTA_NOTICE")?;
        }
        if let Ok(tz) = env::var("DUTYROTA_TZ") {
            if !tz.trim().is_empty() {
                config.timezone = tz;
            }
        }
        if let Ok(path) = env::var("DUTYROTA_DATA") {
            if !path.trim().is_empty() {
                config.data_file = PathBuf::from(path);
            }
        }
        Ok(config)
    }
}
