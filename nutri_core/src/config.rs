//! Configuration file support for nutri.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/nutri/config.toml`.

use crate::{Catalog, Error, MacroSplit, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub calculator: CalculatorConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.jsonl")
    }

    pub fn diary_path(&self) -> PathBuf {
        self.data_dir.join("diary.jsonl")
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    pub fn export_path(&self) -> PathBuf {
        self.data_dir.join("calculations.csv")
    }
}

/// Macro calculation settings
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub macro_split: MacroSplit,
}

/// Where recipes and ingredients come from
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON catalog replacing the built-in one
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Recipe suggestion settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_suggestion_limit")]
    pub limit: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            limit: default_suggestion_limit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| home_dir_or_cwd().join(".local/share"))
        .join("nutri")
}

fn default_suggestion_limit() -> usize {
    5
}

fn home_dir_or_cwd() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        Self::load_or_default(&Self::default_config_path())
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.suggestions.limit == 0 {
            return Err(Error::Config("suggestions.limit must be at least 1".into()));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| home_dir_or_cwd().join(".config"))
            .join("nutri")
            .join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// The configured catalog, or the built-in one
    ///
    /// A custom catalog must pass [`Catalog::validate`]; anything in
    /// [`Catalog::warnings`] is logged and the catalog is still used.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let catalog = match &self.catalog.path {
            Some(path) => Catalog::load_from(path)?,
            None => crate::get_default_catalog().clone(),
        };

        let errors = catalog.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }
        for warning in catalog.warnings() {
            tracing::warn!("{}", warning);
        }
        Ok(catalog)
    }
}
