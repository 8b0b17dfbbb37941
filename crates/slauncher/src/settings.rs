//! Effective launch configuration: file, then command-line overrides.

use std::path::Path;

use launch_engine::LaunchConfig;
use tracing::debug;

use crate::{
    cli::Overrides,
    error::{Error, Result},
};

/// Load `path` (or defaults), apply `overrides`, validate the result.
pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<LaunchConfig> {
    let mut config = match path {
        Some(path) => LaunchConfig::load_from_path(path).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?,
        None => LaunchConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().map_err(Error::Config)?;
    debug!(?config, "effective launch config");
    Ok(config)
}
