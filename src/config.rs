//! Configuration loaded from `config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{TriageError, TriageResult, MAX_KEYWORDS};

const APP_DIR: &str = "rca-triage";
const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "documents.rcad";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Location of the `.rcad` store file.
    pub db_path: PathBuf,
    /// Keywords kept per document, 1 to 10.
    pub max_keywords: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            max_keywords: MAX_KEYWORDS,
        }
    }
}

impl TriageConfig {
    /// Load from an explicit file, or from the default location when
    /// `path` is `None`. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> TriageResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| TriageError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml(&raw).map_err(|e| match e {
            TriageError::Config(msg) => TriageError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(raw: &str) -> TriageResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| TriageError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TriageResult<()> {
        if !(1..=MAX_KEYWORDS).contains(&self.max_keywords) {
            return Err(TriageError::Config(format!(
                "max_keywords must be between 1 and {MAX_KEYWORDS}, got {}",
                self.max_keywords
            )));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(TriageError::Config("db_path must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }
}

/// `<config_dir>/rca-triage/config.toml`, when a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data_dir>/rca-triage/documents.rcad`, falling back to the working
/// directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DB_FILE)
}
