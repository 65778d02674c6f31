use crate::core::rates::{CurrencyCode, normalize_codes};
use crate::providers::boi::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BoiProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; requests wait indefinitely when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for BoiProviderConfig {
    fn default() -> Self {
        BoiProviderConfig {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl BoiProviderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub boi: Option<BoiProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            boi: Some(BoiProviderConfig::default()),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub currencies: Vec<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Loads the default config, falling back to built-in defaults when no
    /// config file has been created yet.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_or_default_from(&config_path)
    }

    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("il", "boi-rates", "boi-rates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Configured currencies, normalised and de-duplicated.
    pub fn currency_set(&self) -> BTreeSet<CurrencyCode> {
        normalize_codes(&self.currencies)
    }

    pub fn boi_provider(&self) -> BoiProviderConfig {
        self.providers.boi.clone().unwrap_or_default()
    }
}
