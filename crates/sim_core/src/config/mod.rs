//! Configuration system
//!
//! Runtime settings for the simulation core. Files are read as TOML or RON,
//! picked by extension; every section falls back to its `Default` when absent.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;
        
        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }
    
    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }

    /// Load configuration from file, or fall back to defaults when the file does not exist
    fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        match Self::load_from_file(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at '{}', using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    
    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Logging output
    pub logging: LoggingConfig,

    /// Limits applied to every scene world
    pub world: WorldConfig,

    /// Initial viewport size delivered to scenes
    pub viewport: ViewportConfig,
}

impl Config for RuntimeConfig {}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: "off", "error", "warn", "info", "debug" or "trace".
    /// `RUST_LOG` still overrides this when set.
    pub level: String,

    /// Prefix log lines with a timestamp
    pub show_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_timestamps: true,
        }
    }
}

/// World limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maximum number of live entities per world, `None` for the identity space limit
    pub max_entities: Option<usize>,
}

/// Viewport dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("sim_core_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name).to_string_lossy().into_owned()
    }

    fn sample() -> RuntimeConfig {
        RuntimeConfig {
            logging: LoggingConfig {
                level: "debug".to_string(),
                show_timestamps: false,
            },
            world: WorldConfig {
                max_entities: Some(64),
            },
            viewport: ViewportConfig {
                width: 800,
                height: 600,
            },
        }
    }

    #[test]
    fn test_toml_file_round_trip() {
        let path = temp_path("runtime.toml");
        sample().save_to_file(&path).unwrap();
        assert_eq!(RuntimeConfig::load_from_file(&path).unwrap(), sample());
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = temp_path("runtime.ron");
        sample().save_to_file(&path).unwrap();
        assert_eq!(RuntimeConfig::load_from_file(&path).unwrap(), sample());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: RuntimeConfig = toml::from_str("[world]\nmax_entities = 10\n").unwrap();
        assert_eq!(config.world.max_entities, Some(10));
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let path = temp_path("settings.json");
        std::fs::write(&path, "{}").unwrap();
        let result = RuntimeConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));

        let err = RuntimeConfig::default().save_to_file("settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_or_default_for_missing_file() {
        let path = temp_path("does_not_exist.toml");
        let config = RuntimeConfig::load_or_default(&path).unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }
}
