//! Configuration for auto-schema

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AutoSchemaError, AutoSchemaResult};
use crate::models::DataType;

/// Environment variable toggling the feature
pub const ENV_ENABLED: &str = "AUTOSCHEMA_ENABLED";
/// Environment variable for the default string kind
pub const ENV_DEFAULT_STRING: &str = "AUTOSCHEMA_DEFAULT_STRING";
/// Environment variable for the default number kind
pub const ENV_DEFAULT_NUMBER: &str = "AUTOSCHEMA_DEFAULT_NUMBER";
/// Environment variable for the default date kind
pub const ENV_DEFAULT_DATE: &str = "AUTOSCHEMA_DEFAULT_DATE";

/// Configuration for auto-schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoSchemaConfig {
    /// Turns the whole feature on or off
    pub enabled: bool,

    /// Kind assigned to free-text strings (`text` or `string`).
    /// `None` falls back to `text`; an empty or null value selects it.
    #[serde(deserialize_with = "deserialize_optional_kind")]
    pub default_string: Option<DataType>,

    /// Kind assigned to numeric literals of unspecified precision
    /// (`int` or `number`)
    pub default_number: DataType,

    /// Kind assigned to RFC3339 timestamps (`date`, `text` or `string`)
    pub default_date: DataType,
}

impl Default for AutoSchemaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_string: Some(DataType::Text),
            default_number: DataType::Number,
            default_date: DataType::Date,
        }
    }
}

impl AutoSchemaConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> AutoSchemaConfigBuilder {
        AutoSchemaConfigBuilder::default()
    }

    /// Read the configuration from `AUTOSCHEMA_*` environment variables
    pub fn from_env() -> AutoSchemaResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through a variable lookup function
    ///
    /// Unset or empty variables keep their defaults. Any value other than
    /// `false` for the enabled flag turns the feature on.
    pub fn from_lookup<F>(lookup: F) -> AutoSchemaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(enabled) = var(ENV_ENABLED) {
            config.enabled = !enabled.eq_ignore_ascii_case("false");
        }
        if let Some(kind) = var(ENV_DEFAULT_STRING) {
            config.default_string = Some(parse_kind(ENV_DEFAULT_STRING, &kind)?);
        }
        if let Some(kind) = var(ENV_DEFAULT_NUMBER) {
            config.default_number = parse_kind(ENV_DEFAULT_NUMBER, &kind)?;
        }
        if let Some(kind) = var(ENV_DEFAULT_DATE) {
            config.default_date = parse_kind(ENV_DEFAULT_DATE, &kind)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every default kind is one the inference can assign
    pub fn validate(&self) -> AutoSchemaResult<()> {
        if !matches!(self.default_number, DataType::Int | DataType::Number) {
            return Err(AutoSchemaError::Config(format!(
                "defaultNumber must be either 'int' or 'number', got '{}'",
                self.default_number
            )));
        }
        if let Some(kind) = &self.default_string {
            if !matches!(kind, DataType::Text | DataType::String) {
                return Err(AutoSchemaError::Config(format!(
                    "defaultString must be either 'string' or 'text', got '{kind}'"
                )));
            }
        }
        if !matches!(
            self.default_date,
            DataType::Date | DataType::Text | DataType::String
        ) {
            return Err(AutoSchemaError::Config(format!(
                "defaultDate must be either 'date' or 'string' or 'text', got '{}'",
                self.default_date
            )));
        }
        Ok(())
    }
}

fn deserialize_optional_kind<'de, D>(deserializer: D) -> Result<Option<DataType>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(kind) if !kind.is_empty() => kind.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn parse_kind(key: &str, value: &str) -> AutoSchemaResult<DataType> {
    value
        .parse()
        .map_err(|e| AutoSchemaError::Config(format!("{key}: {e}")))
}

/// Builder for AutoSchemaConfig
#[derive(Debug, Default)]
pub struct AutoSchemaConfigBuilder {
    config: AutoSchemaConfig,
}

impl AutoSchemaConfigBuilder {
    /// Enable or disable auto-schema
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the default string kind (`None` falls back to text)
    pub fn default_string(mut self, kind: Option<DataType>) -> Self {
        self.config.default_string = kind;
        self
    }

    /// Set the default number kind
    pub fn default_number(mut self, kind: DataType) -> Self {
        self.config.default_number = kind;
        self
    }

    /// Set the default date kind
    pub fn default_date(mut self, kind: DataType) -> Self {
        self.config.default_date = kind;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> AutoSchemaResult<AutoSchemaConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
