//! # gmmio - Gaussian mixture model and feature file I/O
//!
//! `gmmio` reads and writes the model files of GMM-based speaker recognition
//! systems and decodes the acoustic feature files those models are trained
//! on.
//!
//! ## Key Features
//!
//! - **Mixtures**: weighted sets of diagonal (`GD`) or full (`GF`) covariance
//!   Gaussians, stored as tag-nested XML or a compact binary layout.
//!
//! - **Mixture servers**: a shared pool of distributions plus mixtures that
//!   reference pool entries by index, so adapted speaker models can share
//!   components with a world model.
//!
//! - **Feature files**: HTK and SPro 3 headers (with automatic byte order
//!   detection) and headerless `f32` dumps, streamed frame by frame.
//!
//! - **Validation**: semantic checks on weights and covariances that go
//!   beyond what the readers enforce.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gmmio::prelude::*;
//!
//! let config = Config::default()
//!     .with_mixture_files_path("gmm")
//!     .with_model_format(ModelFileFormat::Xml);
//!
//! // Load a diagonal mixture and copy it into a server
//! let world = MixtureFileReader::new("world", &config).read_mixture()?;
//! let mut server = MixtureServer::new("models", world.vect_size());
//! server.add_mixture(&world)?;
//!
//! // Save the server in the compact layout
//! let raw = config.clone().with_model_format(ModelFileFormat::Raw);
//! MixtureServerFileWriter::new("models", &raw).write_mixture_server(&server)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## XML layout
//!
//! Elements carry no attributes; values are leaf text. Indexed values put the
//! index in a nested `<i>` (and `<j>` for full covariance entries):
//!
//! ```xml
//! <MixtureGD>
//!   <version>1</version>
//!   <id>world</id>
//!   <vectSize>2</vectSize>
//!   <distribCount>1</distribCount>
//!   <DistribGD>
//!     <i>0</i>
//!     <weight>1</weight>
//!     <cst>0</cst>
//!     <det>1</det>
//!     <covInv><i>0</i>1</covInv>
//!     <covInv><i>1</i>1</covInv>
//!     <mean><i>0</i>0</mean>
//!     <mean><i>1</i>0</mean>
//!   </DistribGD>
//! </MixtureGD>
//! ```
//!
//! ## Architecture
//!
//! - [`xml`]: streaming XML event parser with tag paths and line tracking
//! - [`model`]: distributions, mixtures and the mixture server
//! - [`mixture`]: single-mixture readers and writers
//! - [`server`]: mixture server readers and writers
//! - [`feature`]: feature file header decoders and frame streaming
//! - [`validator`]: semantic model checks
//! - [`config`]: TOML-loadable reader/writer settings

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod feature;
pub mod mixture;
pub mod model;
pub mod server;
pub mod stream;
pub mod validator;
pub mod xml;

pub use config::{Config, ConfigError};
pub use error::PersistError;
pub use mixture::{MixtureFileReader, MixtureFileWriter};
pub use server::{MixtureServerFileReader, MixtureServerFileWriter};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, Endianness, FeatureFileFormat, ModelFileFormat};
    pub use crate::error::PersistError;
    pub use crate::feature::{
        open_feature_file, FeatureFileReader, FeatureFlags, FeatureHeader, HtkReader,
        RawFeatureReader, Spro3Reader,
    };
    pub use crate::mixture::{MixtureFileReader, MixtureFileWriter};
    pub use crate::model::{
        Component, Distrib, DistribGd, DistribGf, DistribType, Mixture, MixtureGd, MixtureGf,
        MixtureOf, MixtureServer,
    };
    pub use crate::server::{MixtureServerFileReader, MixtureServerFileWriter};
    pub use crate::stream::{ByteSource, FileSource, MemorySource};
    pub use crate::validator::{validate_mixture, validate_mixture_server, ValidationReport};
}
