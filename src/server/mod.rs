//! Mixture server files
//!
//! A server file holds a named pool of distributions followed by mixtures
//! that reference pool entries by index. Both XML and the compact raw layout
//! are supported; the configuration selects which.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::config::{Config, ModelFileFormat};
use crate::error::PersistError;
use crate::model::MixtureServer;
use crate::stream::{ByteSource, Endian, FileSource};

mod raw;
mod xml_reader;
mod xml_writer;

#[cfg(test)]
mod tests;

/// Reads a mixture server from a file or any other [`ByteSource`]
#[derive(Debug, Clone)]
pub struct MixtureServerFileReader<S: ByteSource = FileSource> {
    source: S,
    format: ModelFileFormat,
    endian: Endian,
}

impl MixtureServerFileReader<FileSource> {
    /// Reader for server `name`, located with the configured search path and
    /// load extension
    pub fn new(name: &str, config: &Config) -> Self {
        Self::from_source(FileSource::new(config.mixture_server_load_path(name)), config)
    }
}

impl<S: ByteSource> MixtureServerFileReader<S> {
    /// Reader over an already located source
    pub fn from_source(source: S, config: &Config) -> Self {
        Self {
            source,
            format: config.load_mixture_server_file_format,
            endian: Endian::from_big(config.mixture_file_big_endian),
        }
    }

    /// Name of the underlying source
    pub fn path(&self) -> &Path {
        self.source.name()
    }

    /// Decode a fresh server
    pub fn read_mixture_server(&self) -> Result<MixtureServer, PersistError> {
        debug!(
            "Reading mixture server from {} ({:?})",
            self.source.name().display(),
            self.format
        );
        let server = match self.format {
            ModelFileFormat::Xml => xml_reader::read(&self.source)?,
            ModelFileFormat::Raw => raw::read(&self.source, self.endian)?,
        };
        debug!(
            "Read mixture server '{}': {} distributions, {} mixtures",
            server.name(),
            server.distrib_count(),
            server.mixture_count()
        );
        Ok(server)
    }

    /// Decode into `server`, replacing its content; on error `server` is
    /// left reset
    pub fn read_into(&self, server: &mut MixtureServer) -> Result<(), PersistError> {
        match self.read_mixture_server() {
            Ok(read) => {
                *server = read;
                Ok(())
            }
            Err(e) => {
                server.reset();
                Err(e)
            }
        }
    }
}

/// Writes a mixture server in the configured layout
#[derive(Debug, Clone)]
pub struct MixtureServerFileWriter {
    path: PathBuf,
    format: ModelFileFormat,
    endian: Endian,
}

impl MixtureServerFileWriter {
    /// Writer for server `name`, located with the configured search path and
    /// save extension
    pub fn new(name: &str, config: &Config) -> Self {
        Self::to_path(config.mixture_server_save_path(name), config)
    }

    /// Writer for an explicit path
    pub fn to_path(path: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            path: path.into(),
            format: config.save_mixture_server_file_format,
            endian: Endian::from_big(config.mixture_file_big_endian),
        }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `server` into `out`; `out` is returned flushed
    pub fn write_to<W: Write>(&self, server: &MixtureServer, out: W) -> Result<W, PersistError> {
        let io_err = |e| PersistError::io(&self.path, e);
        let mut out = match self.format {
            ModelFileFormat::Xml => xml_writer::write(server, out),
            ModelFileFormat::Raw => raw::write(server, out, self.endian),
        }
        .map_err(io_err)?;
        out.flush().map_err(io_err)?;
        Ok(out)
    }

    /// Create or truncate the target file and write `server` into it
    pub fn write_mixture_server(&self, server: &MixtureServer) -> Result<(), PersistError> {
        debug!(
            "Writing mixture server '{}' to {}",
            server.name(),
            self.path.display()
        );
        let file = File::create(&self.path).map_err(|e| PersistError::io(&self.path, e))?;
        self.write_to(server, BufWriter::new(file))?;
        Ok(())
    }
}
