//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::BrokerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BrokerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BrokerConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(
            r#"
            [environment]
            mode = "simulated"

            [demo]
            fallback = false
            seed = 3
        "#,
        );
        let config = load_config(file.path()).unwrap();
        assert!(!config.demo.fallback);
        assert_eq!(config.demo.seed, 3);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let file = write_config("this is not toml = = =");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_rejects_semantic_errors() {
        let file = write_config(
            r#"
            [sale]
            token_price = 0.0
        "#,
        );
        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "sale.token_price"));
            }
            other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/broker.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
