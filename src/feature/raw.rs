//! Headerless feature files: consecutive `f32` frames, described entirely by
//! the configuration

use std::path::Path;

use log::warn;

use super::decode::{Decoded, FeatureStream, Layout};
use super::{FeatureFlags, FeatureHeader};
use crate::config::{Config, Endianness};
use crate::error::PersistError;
use crate::stream::{ByteSource, DecodeError, Endian, FileSource};

pub(crate) struct RawFeatures {
    endian: Endian,
    vect_size: Option<usize>,
    sample_rate: f64,
    flags: FeatureFlags,
}

impl Layout for RawFeatures {
    const NAME: &'static str = "raw";

    fn header_len(&self) -> usize {
        0
    }

    fn decode(&mut self, file: &Path, _head: &[u8], len: u64) -> Result<Decoded, DecodeError> {
        let vect_size = match self.vect_size {
            Some(0) => return Err(DecodeError::invalid("vector size 0 for a raw feature file")),
            Some(n) => n,
            None => {
                return Err(DecodeError::invalid(
                    "vector size is not configured for a raw feature file",
                ))
            }
        };
        let frame_bytes = vect_size as u64 * 4;
        let partial = len % frame_bytes;
        if partial != 0 {
            warn!(
                "{} ends with {partial} bytes of a partial {vect_size}-value frame",
                file.display()
            );
        }

        Ok(Decoded {
            header: FeatureHeader {
                frame_count: len / frame_bytes,
                vect_size,
                sample_rate: self.sample_rate,
                flags: self.flags,
            },
            endian: self.endian,
        })
    }
}

/// Reader for headerless `f32` feature files
pub struct RawFeatureReader<S: ByteSource = FileSource> {
    stream: FeatureStream<S, RawFeatures>,
}

impl RawFeatureReader<FileSource> {
    /// Reader for feature file `name`, located with the configured feature
    /// search path and extension
    pub fn new(name: &str, config: &Config) -> Result<Self, PersistError> {
        Self::from_source(FileSource::new(config.feature_load_path(name)), config)
    }
}

impl<S: ByteSource> RawFeatureReader<S> {
    /// Reader over an already located source. Fails when the configured
    /// sample rate or feature flags are unusable.
    pub fn from_source(source: S, config: &Config) -> Result<Self, PersistError> {
        let layout = RawFeatures {
            // no header to detect from
            endian: match config.load_feature_file_endianness {
                Endianness::Big => Endian::Big,
                Endianness::Little | Endianness::Auto => Endian::Little,
            },
            vect_size: config.load_feature_file_vect_size,
            sample_rate: config.raw_sample_rate()?,
            flags: config.raw_feature_flags()?,
        };
        Ok(Self {
            stream: FeatureStream::new(source, layout),
        })
    }
}

feature_reader!(RawFeatureReader);
