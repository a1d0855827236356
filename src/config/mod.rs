mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration from `CONFIG_PATH`, or `config.yaml` when unset.
///
/// A missing `config.yaml` is not an error: the built-in defaults are used.
/// An explicitly named file that cannot be read is.
pub async fn load() -> Result<Config> {
    match env::var("CONFIG_PATH") {
        Ok(config_path) => load_from(&config_path).await,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from(DEFAULT_CONFIG_PATH).await,
        Err(_) => {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

pub async fn load_from(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    // An empty document deserializes to unit, not to a struct with defaults.
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(config_str)?;
    validate(&config)?;
    Ok(config)
}

/// Checks a log filter the way the subscriber will read it.
///
/// Accepts a bare level (`debug`) as well as `EnvFilter` directives such as
/// `tryon_relay=debug,tower_http=info`.
pub fn validate_log_level(level: &str) -> Result<()> {
    tracing_subscriber::EnvFilter::try_new(level)
        .map(|_| ())
        .map_err(|e| {
            Error::config(format!(
                "Invalid log level: '{}' ({}). Valid levels: error, warn, info, debug, trace",
                level, e
            ))
        })
}

fn validate(config: &Config) -> Result<()> {
    validate_log_level(&config.server.logs.level)?;
    if config.server.max_upload_bytes == 0 {
        return Err(Error::config("server.max_upload_bytes must be greater than zero"));
    }
    if config.upstream.endpoint.trim_start_matches('/').is_empty() {
        return Err(Error::config("upstream.endpoint must name a Gradio endpoint"));
    }
    if config.upstream.base_url.is_none() && config.upstream.space.is_empty() {
        return Err(Error::config(
            "either upstream.base_url or upstream.space must be set",
        ));
    }
    Ok(())
}
