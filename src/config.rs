use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::group::{DEFAULT_LABEL, UNLIMITED_LABEL};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PinstoreConfig {
    pub database: Option<String>,
    /// Label of the synthetic "no group" entry
    pub default_label: Option<String>,
    /// Display label of the sentinel group
    pub unlimited_label: Option<String>,
}

impl PinstoreConfig {
    pub fn default_label(&self) -> &str {
        self.default_label.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn unlimited_label(&self) -> &str {
        self.unlimited_label.as_deref().unwrap_or(UNLIMITED_LABEL)
    }

    /// Database path: explicit override, then config, then the default
    pub fn database_path(&self, cli_override: Option<&Path>, base: &Path) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        match &self.database {
            Some(db) => PathBuf::from(db),
            None => default_database_path_in(base),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("pinstore.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".pinstore").join("pins.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<PinstoreConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: PinstoreConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &PinstoreConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> crate::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
