use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::{LedgerError, Result},
    utils::paths::{config_file_in, ensure_dir},
};

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_STORAGE_KEY: &str = "profit_entries";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency_symbol: String,
    pub storage_key: String,
    pub clock_interval_secs: u64,
    pub today_refresh_secs: u64,
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-IN".into(),
            currency_symbol: "₹".into(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            clock_interval_secs: 1,
            today_refresh_secs: 60,
            plain_output: false,
        }
    }
}

impl Config {
    /// Updates a single field from its textual form, as typed at the shell.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "locale" => self.locale = value.to_string(),
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "storage_key" => {
                if value.trim().is_empty() {
                    return Err(LedgerError::ConfigError(
                        "storage_key must not be empty".into(),
                    ));
                }
                self.storage_key = value.trim().to_string();
            }
            "clock_interval_secs" => self.clock_interval_secs = parse_interval(field, value)?,
            "today_refresh_secs" => self.today_refresh_secs = parse_interval(field, value)?,
            "plain_output" => {
                self.plain_output = value.parse().map_err(|_| {
                    LedgerError::ConfigError(format!("`{}` expects true or false", field))
                })?
            }
            other => {
                return Err(LedgerError::ConfigError(format!(
                    "unknown configuration field `{}`",
                    other
                )))
            }
        }
        Ok(())
    }
}

fn parse_interval(field: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(LedgerError::ConfigError(format!(
            "`{}` expects a positive number of seconds",
            field
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config = serde_json::from_str(&data)
                .map_err(|err| LedgerError::ConfigError(err.to_string()))?;
            tracing::debug!(path = %self.path.display(), "configuration loaded");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
