//! Feature file readers
//!
//! Three layouts are supported: HTK parameter files, SPro 3 feature files and
//! headerless `f32` dumps. Every reader decodes its header lazily on the
//! first accessor call and caches it, so asking for the frame count, vector
//! size, flags and sample rate opens the file once.
//!
//! ```no_run
//! use gmmio::feature::{open_feature_file, FeatureFileReader};
//! use gmmio::Config;
//!
//! let config = Config::default().with_feature_files_path("prm");
//! let mut reader = open_feature_file("spk01.prm", &config)?;
//! println!("{} frames of {} values", reader.frame_count()?, reader.vect_size()?);
//! for frame in reader.frames() {
//!     let frame = frame?;
//!     // ...
//! }
//! # Ok::<(), gmmio::PersistError>(())
//! ```

use std::path::Path;

use serde::Serialize;

use crate::config::{Config, FeatureFileFormat};
use crate::error::PersistError;
use crate::stream::{ByteSource, FileSource};

/// Implements [`FeatureFileReader`] for a reader wrapping a `stream` field
macro_rules! feature_reader {
    ($reader:ident) => {
        impl<S: ByteSource> $crate::feature::FeatureFileReader for $reader<S> {
            fn path(&self) -> &std::path::Path {
                self.stream.name()
            }

            fn header(&mut self) -> Result<$crate::feature::FeatureHeader, $crate::PersistError> {
                self.stream.header()
            }

            fn read_frame(&mut self, frame: &mut Vec<f32>) -> Result<bool, $crate::PersistError> {
                self.stream.read_frame(frame)
            }

            fn close(&mut self) {
                self.stream.close()
            }
        }
    };
}

mod decode;
mod flags;
pub mod htk;
pub mod raw;
pub mod spro3;


pub use flags::FeatureFlags;
pub use htk::{HtkKind, HtkReader};
pub use raw::RawFeatureReader;
pub use spro3::Spro3Reader;

/// Decoded feature file header
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureHeader {
    /// Number of frames in the file
    pub frame_count: u64,
    /// Values per frame
    pub vect_size: usize,
    /// Frames per second
    pub sample_rate: f64,
    /// Coefficient groups present in each frame
    pub flags: FeatureFlags,
}

/// Common interface of the feature file readers
///
/// Accessors decode the header on first use; [`FeatureFileReader::close`]
/// drops the cached header and the open stream, so the next call decodes
/// again from the start of the file.
pub trait FeatureFileReader {
    /// Name of the underlying source
    fn path(&self) -> &Path;

    /// Decoded header
    fn header(&mut self) -> Result<FeatureHeader, PersistError>;

    /// Read the next frame into `frame`, replacing its content. Returns
    /// `false` once every frame has been read.
    fn read_frame(&mut self, frame: &mut Vec<f32>) -> Result<bool, PersistError>;

    /// Release the stream and the cached header
    fn close(&mut self);

    /// Number of frames
    fn frame_count(&mut self) -> Result<u64, PersistError> {
        Ok(self.header()?.frame_count)
    }

    /// Values per frame
    fn vect_size(&mut self) -> Result<usize, PersistError> {
        Ok(self.header()?.vect_size)
    }

    /// Coefficient groups present in each frame
    fn flags(&mut self) -> Result<FeatureFlags, PersistError> {
        Ok(self.header()?.flags)
    }

    /// Frames per second
    fn sample_rate(&mut self) -> Result<f64, PersistError> {
        Ok(self.header()?.sample_rate)
    }

    /// Iterate over the remaining frames
    fn frames(&mut self) -> Frames<'_, Self>
    where
        Self: Sized,
    {
        Frames {
            reader: self,
            done: false,
        }
    }
}

impl<R: FeatureFileReader + ?Sized> FeatureFileReader for Box<R> {
    fn path(&self) -> &Path {
        (**self).path()
    }

    fn header(&mut self) -> Result<FeatureHeader, PersistError> {
        (**self).header()
    }

    fn read_frame(&mut self, frame: &mut Vec<f32>) -> Result<bool, PersistError> {
        (**self).read_frame(frame)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Iterator over the frames of a [`FeatureFileReader`]; stops after the
/// first error
pub struct Frames<'a, R: ?Sized> {
    reader: &'a mut R,
    done: bool,
}

impl<R: FeatureFileReader + ?Sized> Iterator for Frames<'_, R> {
    type Item = Result<Vec<f32>, PersistError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut frame = Vec::new();
        match self.reader.read_frame(&mut frame) {
            Ok(true) => Some(Ok(frame)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Reader for feature file `name` in the configured layout, located with
/// the configured feature search path and extension
pub fn open_feature_file(name: &str, config: &Config) -> Result<Box<dyn FeatureFileReader>, PersistError> {
    open_feature_source(FileSource::new(config.feature_load_path(name)), config)
}

/// Reader over `source` in the configured layout
pub fn open_feature_source<S>(source: S, config: &Config) -> Result<Box<dyn FeatureFileReader>, PersistError>
where
    S: ByteSource + 'static,
    S::Reader: 'static,
{
    Ok(match config.load_feature_file_format {
        FeatureFileFormat::Htk => Box::new(HtkReader::from_source(source, config)),
        FeatureFileFormat::Spro3 => Box::new(Spro3Reader::from_source(source, config)),
        FeatureFileFormat::Raw => Box::new(RawFeatureReader::from_source(source, config)?),
    })
}
