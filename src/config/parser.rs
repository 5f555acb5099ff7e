//! Configuration file loading and parsing
//!
//! Reads a TOML file from disk, deserializes it into [`Config`], and runs
//! validation before handing it to the rest of the pipeline.

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::fs;
use std::path::Path;

/// Loads and validates a configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Read, parse, or validation failure
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(contents: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(contents)?;
    validate(&config)?;
    Ok(config)
}
