//! Default manager configuration
//!
//! Hosts that don't let users pick a manager can instead load one named in
//! a TOML file, found through the `ASSETBRIDGE_DEFAULT_CONFIG` environment
//! variable:
//!
//! ```toml
//! [manager]
//! identifier = "org.example.manager"
//!
//! [manager.settings]
//! library_path = "/mnt/assets"
//! ```

use std::path::Path;

use ::config::{Config, File, FileFormat, ValueKind};
use tracing::debug;

use assetbridge_core::{Error, Identifier, InfoDictionary, Result, Value};

/// Environment variable holding the path of the default manager config file
pub const DEFAULT_MANAGER_CONFIG_ENV_VAR: &str = "ASSETBRIDGE_DEFAULT_CONFIG";

/// Manager to use by default, and the settings to initialize it with
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultManagerConfig {
    /// Identifier of the manager
    pub identifier: Identifier,

    /// Settings passed to the manager's `initialize`
    pub settings: InfoDictionary,
}

impl DefaultManagerConfig {
    /// Load the config from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading default manager config");

        if !path.exists() {
            return Err(Error::Configuration(format!(
                "Could not load default manager config from '{}', file does not exist.",
                path.display()
            )));
        }

        let config = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()
            .map_err(|e| {
                Error::Configuration(format!(
                    "Could not parse default manager config from '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        let identifier = config.get_string("manager.identifier").map_err(|_| {
            Error::Configuration(format!(
                "Default manager config '{}' does not specify 'manager.identifier'.",
                path.display()
            ))
        })?;

        let mut settings = InfoDictionary::new();
        if let Ok(table) = config.get_table("manager.settings") {
            for (key, value) in table {
                let value = match value.kind {
                    ValueKind::Boolean(v) => Value::Bool(v),
                    ValueKind::I64(v) => Value::Int(v),
                    ValueKind::Float(v) => Value::Float(v),
                    ValueKind::String(v) => Value::Str(v),
                    _ => {
                        return Err(Error::Configuration(format!(
                            "Unsupported value type for '{}'.",
                            key
                        )))
                    }
                };
                settings.insert(key, value);
            }
        }

        Ok(Self {
            identifier,
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_identifier_and_settings() {
        let file = write_config(
            r#"
[manager]
identifier = "org.example.manager"

[manager.settings]
some_string = "x"
some_int = 1
some_float = 1.5
some_bool = true
"#,
        );

        let config = DefaultManagerConfig::from_file(file.path()).unwrap();

        assert_eq!(config.identifier, "org.example.manager");
        assert_eq!(config.settings.get("some_string"), Some(&Value::from("x")));
        assert_eq!(config.settings.get("some_int"), Some(&Value::Int(1)));
        assert_eq!(config.settings.get("some_float"), Some(&Value::Float(1.5)));
        assert_eq!(config.settings.get("some_bool"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_settings_are_optional() {
        let file = write_config("[manager]\nidentifier = \"org.example.manager\"\n");

        let config = DefaultManagerConfig::from_file(file.path()).unwrap();

        assert!(config.settings.is_empty());
    }

    #[test]
    fn test_unsupported_setting_type() {
        let file = write_config(
            "[manager]\nidentifier = \"org.example.manager\"\n\n[manager.settings]\nsome_list = [1, 2]\n",
        );

        assert_eq!(
            DefaultManagerConfig::from_file(file.path()),
            Err(Error::Configuration("Unsupported value type for 'some_list'.".to_string()))
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = DefaultManagerConfig::from_file(&path).unwrap_err();

        assert_eq!(
            err,
            Error::Configuration(format!(
                "Could not load default manager config from '{}', file does not exist.",
                path.display()
            ))
        );
        assert!(err.is_input_validation());
    }

    #[test]
    fn test_missing_identifier() {
        let file = write_config("[manager.settings]\nsome_int = 1\n");

        let err = DefaultManagerConfig::from_file(file.path()).unwrap_err();

        assert!(matches!(err, Error::Configuration(msg) if msg.contains("manager.identifier")));
    }
}
