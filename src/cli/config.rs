//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, users can keep reader and writer
//! settings in a config file:
//!
//! ```toml
//! # gmmio.toml
//! mixture_files_path = "gmm"
//! load_mixture_file_format = "xml"
//! save_mixture_file_format = "raw"
//! mixture_file_big_endian = false
//! load_feature_file_format = "spro3"
//! ```
//!
//! Command-line flags override the file.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use gmmio::Config;

/// Settings from `path`, or the defaults when no file is given
pub fn load(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            info!("Loading settings from {}", path.display());
            Config::from_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}
