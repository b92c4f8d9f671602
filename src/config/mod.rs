use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::errors::ConfigError;

const DEFAULT_DIR_NAME: &str = ".intake_core";
const HOME_ENV: &str = "INTAKE_CORE_HOME";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Keys accepted by [`Config::set`].
pub const CONFIG_KEYS: [&str; 4] = [
    "locale",
    "expanded_sections",
    "confirm_destructive",
    "screen_reader_mode",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    /// Sections expanded when a session starts or is reset.
    pub expanded_sections: Vec<String>,
    /// Ask before `entry clear` in interactive mode.
    pub confirm_destructive: bool,
    /// Plain output without colors.
    pub screen_reader_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "de-DE".into(),
            expanded_sections: vec!["stammdaten".into(), "symptomatik".into()],
            confirm_destructive: true,
            screen_reader_mode: false,
        }
    }
}

impl Config {
    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "locale" => {
                let locale = value.trim();
                if locale.is_empty() {
                    return Err("locale must not be empty".into());
                }
                self.locale = locale.to_string();
            }
            "expanded_sections" => {
                self.expanded_sections = value
                    .split(',')
                    .map(str::trim)
                    .filter(|section| !section.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "confirm_destructive" => self.confirm_destructive = parse_switch(value)?,
            "screen_reader_mode" => self.screen_reader_mode = parse_switch(value)?,
            other => {
                return Err(format!(
                    "unknown setting `{}` (expected one of: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                ))
            }
        }
        Ok(())
    }
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "ja" | "yes" | "1" => Ok(true),
        "off" | "false" | "nein" | "no" | "0" => Ok(false),
        other => Err(format!("expected on/off, got `{}`", other)),
    }
}

/// Returns the application data directory, defaulting to `~/.intake_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the stored configuration; a missing file yields the defaults.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
