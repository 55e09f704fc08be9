use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::game::board;

const CONFIG_DIR_NAME: &str = "matchgrid";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub columns: usize,
    pub rows: usize,
    pub time_limit_seconds: u32,
    pub symbols: Vec<String>,
    pub theme: String,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 860,
            height: 680,
            columns: 4,
            rows: 4,
            time_limit_seconds: 60,
            symbols: (1..=10).map(|n| n.to_string()).collect(),
            theme: "default_theme".to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults, then the JSON config file if one exists, then `MATCHGRID_*` overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        info!(
            columns = config.columns,
            rows = config.rows,
            time_limit = config.time_limit_seconds,
            theme = %config.theme,
            "configuration loaded"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MATCHGRID_COLUMNS") {
            self.columns = parse_env("MATCHGRID_COLUMNS", &v)?;
        }
        if let Some(v) = lookup("MATCHGRID_ROWS") {
            self.rows = parse_env("MATCHGRID_ROWS", &v)?;
        }
        if let Some(v) = lookup("MATCHGRID_TIME_LIMIT") {
            self.time_limit_seconds = parse_env("MATCHGRID_TIME_LIMIT", &v)?;
        }
        if let Some(v) = lookup("MATCHGRID_THEME") {
            let theme = v.trim();
            if !theme.is_empty() {
                self.theme = theme.to_string();
            }
        }
        if let Some(v) = lookup("MATCHGRID_SEED") {
            self.seed = Some(parse_env("MATCHGRID_SEED", &v)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        board::check_layout(self.columns, self.rows, &self.symbols)?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MATCHGRID_CONFIG") {
        return Some(PathBuf::from(path));
    }
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var("HOME").ok()?).join(".config"),
    };
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn debug_mode_enabled() -> bool {
    match std::env::var("MATCHGRID_DEBUG") {
        Ok(value) => {
            let v = value.trim().to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "yes" | "on")
        }
        Err(_) => false,
    }
}
