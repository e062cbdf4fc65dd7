use crate::domain::ports::{ConfigProvider, DecodePolicy};
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "vehicle-store")]
#[command(about = "Keeps a vehicle collection in JSON and XML files")]
pub struct CliConfig {
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    #[arg(long, default_value = "vehicles.json")]
    pub json_file: String,

    #[arg(long, default_value = "vehicles.xml")]
    pub xml_file: String,

    #[arg(long, value_enum, default_value_t = DecodePolicy::Abort)]
    pub on_decode_error: DecodePolicy,

    #[arg(long, help = "TOML configuration file; replaces the path flags when given")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn json_file(&self) -> &str {
        &self.json_file
    }

    fn xml_file(&self) -> &str {
        &self.xml_file
    }

    fn decode_policy(&self) -> DecodePolicy {
        self.on_decode_error
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_file_extension("json_file", &self.json_file, "json")?;
        validate_file_extension("xml_file", &self.xml_file, "xml")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::parse_from(["vehicle-store"]);
        assert_eq!(config.data_dir(), ".");
        assert_eq!(config.json_file(), "vehicles.json");
        assert_eq!(config.xml_file(), "vehicles.xml");
        assert_eq!(config.decode_policy(), DecodePolicy::Abort);
        assert!(config.config.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let config = CliConfig::parse_from([
            "vehicle-store",
            "--data-dir",
            "/tmp/fleet",
            "--json-file",
            "fleet.json",
            "--on-decode-error",
            "skip",
            "--verbose",
        ]);
        assert_eq!(config.data_dir(), "/tmp/fleet");
        assert_eq!(config.json_file(), "fleet.json");
        assert_eq!(config.decode_policy(), DecodePolicy::Skip);
        assert!(config.verbose);
    }

    #[test]
    fn test_validation_rejects_wrong_extension() {
        let config = CliConfig::parse_from(["vehicle-store", "--xml-file", "fleet.json"]);
        assert!(config.validate().is_err());
    }
}
