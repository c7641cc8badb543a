//! Single-mixture files
//!
//! [`MixtureFileReader`] resolves a mixture name through the configured
//! search path and extension, then decodes it with the configured layout.
//! [`MixtureFileWriter`] does the reverse.
//!
//! ```no_run
//! use gmmio::{Config, MixtureFileReader};
//!
//! let config = Config::default().with_mixture_files_path("gmm");
//! let world = MixtureFileReader::new("world", &config).read_mixture_gd()?;
//! println!("{} distributions", world.distrib_count());
//! # Ok::<(), gmmio::PersistError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{Config, ModelFileFormat};
use crate::error::PersistError;
use crate::model::{Mixture, MixtureGd, MixtureGf};
use crate::stream::{ByteSource, Endian, FileSource};

pub(crate) mod raw;
pub(crate) mod xml_reader;
pub(crate) mod xml_writer;


/// Reads one mixture from a file or any other [`ByteSource`]
#[derive(Debug, Clone)]
pub struct MixtureFileReader<S: ByteSource = FileSource> {
    source: S,
    format: ModelFileFormat,
    endian: Endian,
}

impl MixtureFileReader<FileSource> {
    /// Reader for mixture `name`, located with the configured search path
    /// and load extension
    pub fn new(name: &str, config: &Config) -> Self {
        Self::from_source(FileSource::new(config.mixture_load_path(name)), config)
    }
}

impl<S: ByteSource> MixtureFileReader<S> {
    /// Reader over an already located source
    pub fn from_source(source: S, config: &Config) -> Self {
        Self {
            source,
            format: config.load_mixture_file_format,
            endian: Endian::from_big(config.mixture_file_big_endian),
        }
    }

    /// Name of the underlying source
    pub fn path(&self) -> &Path {
        self.source.name()
    }

    /// Decode the mixture, whatever its family
    pub fn read_mixture(&self) -> Result<Mixture, PersistError> {
        debug!(
            "Reading mixture from {} ({:?})",
            self.source.name().display(),
            self.format
        );
        let mixture = match self.format {
            ModelFileFormat::Xml => xml_reader::read(&self.source)?,
            ModelFileFormat::Raw => raw::read(&self.source, self.endian)?,
        };
        debug!(
            "Read {} mixture '{}': {} distributions of size {}",
            mixture.kind(),
            mixture.id(),
            mixture.distrib_count(),
            mixture.vect_size()
        );
        Ok(mixture)
    }

    /// Decode a diagonal-covariance mixture; a GF file is unsupported here
    pub fn read_mixture_gd(&self) -> Result<MixtureGd, PersistError> {
        self.read_mixture()?
            .into_gd()
            .map_err(|e| PersistError::unsupported(self.source.name(), e.to_string()))
    }

    /// Decode a full-covariance mixture; a GD file is unsupported here
    pub fn read_mixture_gf(&self) -> Result<MixtureGf, PersistError> {
        self.read_mixture()?
            .into_gf()
            .map_err(|e| PersistError::unsupported(self.source.name(), e.to_string()))
    }
}

/// Writes one mixture in the configured layout
#[derive(Debug, Clone)]
pub struct MixtureFileWriter {
    path: PathBuf,
    format: ModelFileFormat,
    endian: Endian,
}

impl MixtureFileWriter {
    /// Writer for mixture `name`, located with the configured search path
    /// and save extension
    pub fn new(name: &str, config: &Config) -> Self {
        Self::to_path(config.mixture_save_path(name), config)
    }

    /// Writer for an explicit path
    pub fn to_path(path: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            path: path.into(),
            format: config.save_mixture_file_format,
            endian: Endian::from_big(config.mixture_file_big_endian),
        }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `mixture` into `out`; `out` is returned flushed
    pub fn write_to<W: Write>(&self, mixture: &Mixture, out: W) -> Result<W, PersistError> {
        let io_err = |e| PersistError::io(&self.path, e);
        let mut out = match self.format {
            ModelFileFormat::Xml => xml_writer::write(mixture, out),
            ModelFileFormat::Raw => raw::write(mixture, out, self.endian),
        }
        .map_err(io_err)?;
        out.flush().map_err(io_err)?;
        Ok(out)
    }

    /// Create or truncate the target file and write `mixture` into it
    pub fn write_mixture(&self, mixture: &Mixture) -> Result<(), PersistError> {
        debug!("Writing mixture '{}' to {}", mixture.id(), self.path.display());
        let file = File::create(&self.path).map_err(|e| PersistError::io(&self.path, e))?;
        self.write_to(mixture, BufWriter::new(file))?;
        Ok(())
    }
}
