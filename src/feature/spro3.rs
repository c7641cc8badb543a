//! SPro 3 feature files
//!
//! 10-byte header: `u16` dimension, `u32` flag word, `f32` frame rate. The
//! frame count is not stored; it follows from the payload length.

use std::path::Path;

use log::debug;

use super::decode::{Decoded, FeatureStream, Layout};
use super::{FeatureFlags, FeatureHeader};
use crate::config::{Config, Endianness};
use crate::stream::{ByteSource, DecodeError, Endian, EndianReader, FileSource};

const HEADER_LEN: usize = 10;

const WITHE: u32 = 0x01;
const WITHZ: u32 = 0x02;
const WITHN: u32 = 0x04;
const WITHD: u32 = 0x08;
const WITHA: u32 = 0x10;
const KNOWN: u32 = WITHE | WITHZ | WITHN | WITHD | WITHA;

#[derive(Debug, Clone, Copy)]
struct RawHeader {
    dim: u16,
    flags: u32,
    rate: f32,
}

impl RawHeader {
    fn parse(head: &[u8], endian: Endian) -> Result<Self, DecodeError> {
        let mut r = EndianReader::new(head, endian);
        Ok(Self {
            dim: r.read_u16()?,
            flags: r.read_u32()?,
            rate: r.read_f32()?,
        })
    }

    /// Frame count implied by the file length
    fn frame_count(&self, len: u64) -> Result<u64, DecodeError> {
        if self.dim == 0 {
            return Err(DecodeError::invalid("Wrong header: zero dimension"));
        }
        if self.flags & !KNOWN != 0 {
            return Err(DecodeError::invalid(format!(
                "Wrong header: unknown flag bits {:#x}",
                self.flags & !KNOWN
            )));
        }
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(DecodeError::invalid(format!("Wrong header: frame rate {}", self.rate)));
        }
        let payload = len - HEADER_LEN as u64;
        let frame_bytes = u64::from(self.dim) * 4;
        if payload % frame_bytes != 0 {
            return Err(DecodeError::invalid(format!(
                "Wrong header: {payload} payload bytes are not a whole number of {}-value frames",
                self.dim
            )));
        }
        Ok(payload / frame_bytes)
    }

    fn flags(&self) -> FeatureFlags {
        FeatureFlags::from_qualifiers(
            self.flags & WITHE != 0,
            self.flags & WITHD != 0,
            self.flags & WITHA != 0,
            self.flags & WITHN != 0,
        )
    }
}

/// SPro 3 header layout
pub(crate) struct Spro3 {
    endianness: Endianness,
    vect_size: Option<usize>,
}

impl Layout for Spro3 {
    const NAME: &'static str = "SPro3";

    fn header_len(&self) -> usize {
        HEADER_LEN
    }

    fn decode(&mut self, _file: &Path, head: &[u8], len: u64) -> Result<Decoded, DecodeError> {
        let native = Endian::Little;
        let endian = match self.endianness {
            Endianness::Big => Endian::Big,
            Endianness::Little => Endian::Little,
            Endianness::Auto => {
                let swapped = native.swapped();
                if RawHeader::parse(head, native)?.frame_count(len).is_err()
                    && RawHeader::parse(head, swapped)?.frame_count(len).is_ok()
                {
                    debug!("SPro3 header is only consistent as {swapped:?}");
                    swapped
                } else {
                    native
                }
            }
        };

        let raw = RawHeader::parse(head, endian)?;
        let frame_count = raw.frame_count(len)?;
        let vect_size = usize::from(raw.dim);
        if let Some(pinned) = self.vect_size {
            if pinned != vect_size {
                return Err(DecodeError::invalid(format!(
                    "Wrong header: vector size {vect_size} does not match the configured {pinned}"
                )));
            }
        }

        Ok(Decoded {
            header: FeatureHeader {
                frame_count,
                vect_size,
                sample_rate: f64::from(raw.rate),
                flags: raw.flags(),
            },
            endian,
        })
    }
}

/// Reader for SPro 3 feature files
pub struct Spro3Reader<S: ByteSource = FileSource> {
    stream: FeatureStream<S, Spro3>,
}

impl Spro3Reader<FileSource> {
    /// Reader for feature file `name`, located with the configured feature
    /// search path and extension
    pub fn new(name: &str, config: &Config) -> Self {
        Self::from_source(FileSource::new(config.feature_load_path(name)), config)
    }
}

impl<S: ByteSource> Spro3Reader<S> {
    /// Reader over an already located source
    pub fn from_source(source: S, config: &Config) -> Self {
        let layout = Spro3 {
            endianness: config.load_feature_file_endianness,
            vect_size: config.load_feature_file_vect_size,
        };
        Self {
            stream: FeatureStream::new(source, layout),
        }
    }
}

feature_reader!(Spro3Reader);
