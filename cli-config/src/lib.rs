//! Loading and saving the STCEx client configuration file.
//!
//! The configuration is a YAML document; see [`Config`] for its fields.
//! Missing fields take the values of the deployed BNB Smart Chain contracts.

mod config;

pub use config::{Config, ContractAddresses, CONFIG_FILE};
use {
    std::{
        fs::{create_dir_all, File},
        io::{self, Write},
        path::Path,
    },
    thiserror::Error,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file i/o: {0}")]
    Io(#[from] io::Error),

    #[error("config file format: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Load a value from a file in YAML format.
pub fn load_config_file<T, P>(config_file: P) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(config_file)?;
    let config = serde_yaml::from_reader(file)?;
    Ok(config)
}

/// Save a value to a file in YAML format, creating parent directories.
pub fn save_config_file<T, P>(config: &T, config_file: P) -> Result<(), ConfigError>
where
    T: serde::ser::Serialize,
    P: AsRef<Path>,
{
    let serialized = serde_yaml::to_string(config)?;

    if let Some(outdir) = config_file.as_ref().parent() {
        create_dir_all(outdir)?;
    }
    let mut file = File::create(config_file)?;
    file.write_all(serialized.as_bytes())?;

    Ok(())
}
