use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing or malformed data in {context}: {message}")]
    MissingData { context: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A vehicle or one of its parts could not be built or decoded.
    Data,
    /// Reading, writing or parsing a whole document failed.
    Storage,
    Configuration,
}

impl StoreError {
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing_data(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingData {
            context: context.into(),
            message: message.into(),
        }
    }

    /// True when the error is a storage read of a file that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::IoError(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidValue { .. } | Self::MissingData { .. } => ErrorCategory::Data,
            Self::IoError(_) | Self::SerializationError(_) | Self::XmlError(_) => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidValue { field, reason, .. } => {
                format!("A vehicle part has an invalid {}: {}", field, reason)
            }
            Self::MissingData { context, message } => {
                format!("The data file is incomplete ({}): {}", context, message)
            }
            Self::IoError(e) => format!("Could not access the data file: {}", e),
            Self::SerializationError(e) => format!("The JSON file could not be parsed: {}", e),
            Self::XmlError(e) => format!("The XML file could not be parsed: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Data => {
                "Fix or remove the offending entry, or rerun with --on-decode-error skip"
            }
            ErrorCategory::Storage => {
                "Check that the data directory is writable and the files are valid JSON/XML"
            }
            ErrorCategory::Configuration => "Check the command line flags and the TOML file",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = StoreError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(err.is_not_found());
        assert_eq!(err.category(), ErrorCategory::Storage);

        let err = StoreError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_data_errors_are_distinct() {
        let invalid = StoreError::invalid_value("power", 0, "must be greater than 0");
        let missing = StoreError::missing_data("record 0", "missing field `engine`");

        assert_eq!(invalid.category(), ErrorCategory::Data);
        assert_eq!(missing.category(), ErrorCategory::Data);
        assert!(matches!(invalid, StoreError::InvalidValue { .. }));
        assert!(matches!(missing, StoreError::MissingData { .. }));
        assert!(invalid.to_string().contains("power"));
    }
}
