use crate::domain::ports::{ConfigProvider, DecodePolicy};
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub decoding: Option<DecodingConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub json_file: String,
    pub xml_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodingConfig {
    pub on_error: Option<DecodePolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StoreError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StoreError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StoreError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("storage.data_dir", self.data_dir())?;
        validate_file_extension("storage.json_file", &self.storage.json_file, "json")?;
        validate_file_extension("storage.xml_file", &self.storage.xml_file, "xml")?;

        let level = self.log_level();
        if !LOG_LEVELS.contains(&level) {
            return Err(StoreError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: level.to_string(),
                reason: format!("Unsupported level. Valid levels: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        self.storage.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    fn json_file(&self) -> &str {
        &self.storage.json_file
    }

    fn xml_file(&self) -> &str {
        &self.storage.xml_file
    }

    fn decode_policy(&self) -> DecodePolicy {
        self.decoding
            .as_ref()
            .and_then(|d| d.on_error)
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
