use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

pub mod items;
pub mod logging;

pub use items::{ItemConfig, NbtEncoding};
pub use logging::LoggingConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't read configuration file at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Couldn't parse config at {path}. Reason: {message}. This is probably caused by a config update. Just delete the old config and restart.")]
    Parse { path: String, message: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything the item server reads from `configuration.toml`.
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GourdConfiguration {
    pub logging: LoggingConfig,
    pub items: ItemConfig,
}

pub trait LoadTomlConfiguration {
    /// Loads the configuration at `path`, writing out the defaults first if nothing is there yet.
    fn load_from(path: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config = if path.exists() {
            let file_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;

            toml::from_str(&file_content).map_err(|err| ConfigError::Parse {
                path: path.display().to_string(),
                message: err.message().to_string(),
            })?
        } else {
            let content = Self::default();

            match toml::to_string(&content) {
                Ok(serialized) => {
                    if let Err(err) = fs::write(path, serialized) {
                        warn!("Couldn't write default config to {:?}. Reason: {}", path, err);
                    }
                }
                Err(err) => warn!("Couldn't serialize default config. Reason: {}", err),
            }

            content
        };

        config.validate()?;
        Ok(config)
    }

    fn load() -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        Self::load_from(Self::get_path())
    }

    fn get_path() -> &'static Path;

    fn validate(&self) -> Result<(), ConfigError>;
}

impl LoadTomlConfiguration for GourdConfiguration {
    fn get_path() -> &'static Path {
        Path::new("configuration.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.items.validate()
    }
}
