//! Read-only configuration consumed by readers and writers.
//!
//! Settings can be built in code or loaded from a TOML file:
//!
//! ```toml
//! # gmmio.toml
//! mixture_files_path = "models/"
//! load_mixture_file_extension = ".xml"
//! save_mixture_file_format = "raw"
//! load_feature_file_format = "htk"
//! load_feature_file_endianness = "auto"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::feature::FeatureFlags;

/// Errors that can occur while loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting holds a value readers cannot use
    #[error("Invalid setting {field}: {message}")]
    Invalid {
        /// Name of the offending setting
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// On-disk layout of a mixture or mixture server file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFileFormat {
    /// Tag-nested XML layout
    #[default]
    Xml,
    /// Compact binary field dump
    Raw,
}

/// Layout of a feature file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureFileFormat {
    /// HTK parameter file (12-byte header)
    #[default]
    Htk,
    /// SPro 3.x feature file (10-byte header)
    Spro3,
    /// Headerless 32-bit float dump
    Raw,
}

/// Byte order selection for binary files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Detect from header consistency, falling back to the format's native order
    #[default]
    Auto,
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

/// Configuration object
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory searched for mixture and mixture server files
    pub mixture_files_path: PathBuf,
    /// Directory searched for feature files
    pub feature_files_path: PathBuf,

    /// Extension appended when loading a mixture file
    pub load_mixture_file_extension: String,
    /// Extension appended when saving a mixture file
    pub save_mixture_file_extension: String,
    /// Extension appended when loading a mixture server file
    pub load_mixture_server_file_extension: String,
    /// Extension appended when saving a mixture server file
    pub save_mixture_server_file_extension: String,
    /// Extension appended when loading a feature file
    pub load_feature_file_extension: String,

    /// Layout expected when loading a mixture
    pub load_mixture_file_format: ModelFileFormat,
    /// Layout used when saving a mixture
    pub save_mixture_file_format: ModelFileFormat,
    /// Layout expected when loading a mixture server
    pub load_mixture_server_file_format: ModelFileFormat,
    /// Layout used when saving a mixture server
    pub save_mixture_server_file_format: ModelFileFormat,
    /// Layout expected when loading a feature file
    pub load_feature_file_format: FeatureFileFormat,

    /// Byte order of feature files
    pub load_feature_file_endianness: Endianness,
    /// Byte order of raw mixture and mixture server files
    pub mixture_file_big_endian: bool,

    /// Vector size of raw feature files; also pins the size expected from
    /// HTK and SPro 3 headers when set
    pub load_feature_file_vect_size: Option<usize>,
    /// Sample rate reported for raw feature files
    pub sample_rate: f64,
    /// Feature flags reported for raw feature files, as a six-character
    /// `0`/`1` string (see [`FeatureFlags`])
    pub feature_flags: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mixture_files_path: PathBuf::new(),
            feature_files_path: PathBuf::new(),
            load_mixture_file_extension: ".xml".to_string(),
            save_mixture_file_extension: ".xml".to_string(),
            load_mixture_server_file_extension: ".xml".to_string(),
            save_mixture_server_file_extension: ".xml".to_string(),
            load_feature_file_extension: String::new(),
            load_mixture_file_format: ModelFileFormat::Xml,
            save_mixture_file_format: ModelFileFormat::Xml,
            load_mixture_server_file_format: ModelFileFormat::Xml,
            save_mixture_server_file_format: ModelFileFormat::Xml,
            load_feature_file_format: FeatureFileFormat::Htk,
            load_feature_file_endianness: Endianness::Auto,
            mixture_file_big_endian: false,
            load_feature_file_vect_size: None,
            sample_rate: 100.0,
            feature_flags: "100000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Use `path` as the mixture search directory
    pub fn with_mixture_files_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mixture_files_path = path.into();
        self
    }

    /// Use `path` as the feature search directory
    pub fn with_feature_files_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.feature_files_path = path.into();
        self
    }

    /// Use the same extension for loading and saving mixtures and servers
    pub fn with_mixture_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.load_mixture_file_extension = ext.clone();
        self.save_mixture_file_extension = ext.clone();
        self.load_mixture_server_file_extension = ext.clone();
        self.save_mixture_server_file_extension = ext;
        self
    }

    /// Use `format` for loading and saving mixtures and servers
    pub fn with_model_format(mut self, format: ModelFileFormat) -> Self {
        self.load_mixture_file_format = format;
        self.save_mixture_file_format = format;
        self.load_mixture_server_file_format = format;
        self.save_mixture_server_file_format = format;
        self
    }

    /// Select the feature file layout
    pub fn with_feature_format(mut self, format: FeatureFileFormat) -> Self {
        self.load_feature_file_format = format;
        self
    }

    /// Select the feature file byte order
    pub fn with_feature_endianness(mut self, endianness: Endianness) -> Self {
        self.load_feature_file_endianness = endianness;
        self
    }

    /// Pin the feature vector size
    pub fn with_feature_vect_size(mut self, vect_size: usize) -> Self {
        self.load_feature_file_vect_size = Some(vect_size);
        self
    }

    /// Feature flags for raw feature files
    pub fn raw_feature_flags(&self) -> Result<FeatureFlags, ConfigError> {
        self.feature_flags.parse().map_err(|message| ConfigError::Invalid {
            field: "feature_flags",
            message,
        })
    }

    /// Sample rate for raw feature files
    pub fn raw_sample_rate(&self) -> Result<f64, ConfigError> {
        if self.sample_rate.is_finite() && self.sample_rate > 0.0 {
            Ok(self.sample_rate)
        } else {
            Err(ConfigError::Invalid {
                field: "sample_rate",
                message: format!("{} is not a positive rate", self.sample_rate),
            })
        }
    }

    /// Full path of a mixture file to load
    pub fn mixture_load_path(&self, name: &str) -> PathBuf {
        resolve(&self.mixture_files_path, name, &self.load_mixture_file_extension)
    }

    /// Full path of a mixture file to save
    pub fn mixture_save_path(&self, name: &str) -> PathBuf {
        resolve(&self.mixture_files_path, name, &self.save_mixture_file_extension)
    }

    /// Full path of a mixture server file to load
    pub fn mixture_server_load_path(&self, name: &str) -> PathBuf {
        resolve(&self.mixture_files_path, name, &self.load_mixture_server_file_extension)
    }

    /// Full path of a mixture server file to save
    pub fn mixture_server_save_path(&self, name: &str) -> PathBuf {
        resolve(&self.mixture_files_path, name, &self.save_mixture_server_file_extension)
    }

    /// Full path of a feature file to load
    pub fn feature_load_path(&self, name: &str) -> PathBuf {
        resolve(&self.feature_files_path, name, &self.load_feature_file_extension)
    }
}

/// `dir/name + ext`; an absolute `name` ignores `dir`
pub fn resolve(dir: &Path, name: &str, ext: &str) -> PathBuf {
    dir.join(format!("{name}{ext}"))
}
