use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Environment variable holding a colon separated list of config files.
pub const CONFIG_PATH_ENV: &str = "PORTFOLIO_CONFIG";

/// Loads the config files listed in `PORTFOLIO_CONFIG`, or the bundled
/// default config if the variable is not set.
pub fn load() -> anyhow::Result<Config> {
    let paths = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(paths) => std::env::split_paths(&paths).collect(),
        None => vec![PathBuf::from(DEFAULT_CONFIG_PATH)],
    };
    load_with_override(&paths, &[])
}

/// Loads the given config files in order, followed by the inline TOML
/// `overrides` and finally the `PORTFOLIO__*` environment variables.
pub fn load_with_override(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    overrides
        .iter()
        .fold(builder, |builder, source| {
            builder.add_source(File::from_str(source, FileFormat::Toml))
        })
        .add_source(Environment::with_prefix("PORTFOLIO").prefix_separator("__").separator("__"))
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub contact: ContactConfig,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub endpoint: Url,
    pub timeout: Option<Duration>,
}
