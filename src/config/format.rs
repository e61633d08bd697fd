//! On-disk document formats for configuration files

use super::value::{Config, ConfigValue};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot encode as TOML: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("top level must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Document format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// `.toml` and `.yaml`/`.yml` select those formats; anything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    pub fn parse(self, content: &str) -> Result<Config, FormatError> {
        let document: ConfigValue = match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        };

        match document {
            ConfigValue::Map(entries) => Ok(Config::from(entries)),
            other => Err(FormatError::NotAMapping(kind_name(&other))),
        }
    }

    pub fn render(self, config: &Config) -> Result<String, FormatError> {
        let rendered = match self {
            Self::Json => {
                let mut json = serde_json::to_string_pretty(config)?;
                json.push('\n');
                json
            }
            Self::Toml => toml::to_string_pretty(config)?,
            Self::Yaml => serde_yaml::to_string(config)?,
        };
        Ok(rendered)
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Toml => f.write_str("TOML"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

fn kind_name(value: &ConfigValue) -> &'static str {
    match value {
        ConfigValue::Null => "null",
        ConfigValue::Bool(_) => "a boolean",
        ConfigValue::Integer(_) | ConfigValue::Float(_) => "a number",
        ConfigValue::String(_) => "a string",
        ConfigValue::List(_) => "a list",
        ConfigValue::Map(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(&PathBuf::from("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(&PathBuf::from("a.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(&PathBuf::from("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(&PathBuf::from("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(&PathBuf::from("settings")), ConfigFormat::Json);
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        let err = ConfigFormat::Json.parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, FormatError::NotAMapping("a list")));

        let err = ConfigFormat::Yaml.parse("just a string").unwrap_err();
        assert!(matches!(err, FormatError::NotAMapping("a string")));
    }

    #[test]
    fn test_parse_value_kinds() {
        let config = ConfigFormat::Json
            .parse(r#"{"timeout": 2.5, "retries": 3, "name": "x", "debug": true, "extra": null}"#)
            .unwrap();

        assert_eq!(config.get("timeout"), Some(&ConfigValue::Float(2.5)));
        assert_eq!(config.get("retries"), Some(&ConfigValue::Integer(3)));
        assert_eq!(config.get("name"), Some(&ConfigValue::from("x")));
        assert_eq!(config.get("debug"), Some(&ConfigValue::Bool(true)));
        assert_eq!(config.get("extra"), Some(&ConfigValue::Null));
    }

    #[test]
    fn test_toml_nested_tables() {
        let config = ConfigFormat::Toml
            .parse("timeout = 10\n\n[database]\nhost = \"localhost\"\nport = 5432\n")
            .unwrap();

        let database = config.get("database").and_then(ConfigValue::as_map).unwrap();
        assert_eq!(database.get("port"), Some(&ConfigValue::Integer(5432)));
        assert_eq!(config.get("timeout"), Some(&ConfigValue::Integer(10)));
    }

    #[test]
    fn test_json_render_is_pretty() {
        let rendered = ConfigFormat::Json.render(&Config::defaults()).unwrap();
        assert!(rendered.contains("\n  \"batch_size\": 100"));
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_toml_cannot_encode_null() {
        let mut config = Config::defaults();
        config.insert("nothing", ConfigValue::Null);
        assert!(ConfigFormat::Toml.render(&config).is_err());
    }
}
