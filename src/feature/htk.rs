//! HTK parameter files
//!
//! 12-byte header: `i32` frame count, `i32` sampling period in 100 ns units,
//! `i16` bytes per frame, `i16` parameter kind. Frames follow as `f32`
//! values. HTK writes big-endian; little-endian files from other tools are
//! recognized when the configured byte order is `auto`.

use std::fmt;
use std::path::Path;

use log::debug;
use serde::Serialize;

use super::decode::{Decoded, FeatureStream, Layout};
use super::{FeatureFlags, FeatureHeader};
use crate::config::{Config, Endianness};
use crate::error::PersistError;
use crate::stream::{ByteSource, DecodeError, Endian, EndianReader, FileSource};

const HEADER_LEN: usize = 12;
const PERIOD_UNITS_PER_SECOND: f64 = 10_000_000.0;

/// HTK parameter kind: base parameterization plus qualifier bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HtkKind(u16);

impl HtkKind {
    /// Has energy
    pub const ENERGY: u16 = 0o100;
    /// Absolute energy suppressed
    pub const NO_ENERGY: u16 = 0o200;
    /// Has delta coefficients
    pub const DELTA: u16 = 0o400;
    /// Has acceleration coefficients
    pub const ACCEL: u16 = 0o1000;
    /// Compressed
    pub const COMPRESSED: u16 = 0o2000;
    /// Zero mean static coefficients
    pub const ZERO_MEAN: u16 = 0o4000;
    /// Has CRC checksum
    pub const CHECKSUM: u16 = 0o10000;
    /// Has 0th cepstral coefficient
    pub const ZEROTH: u16 = 0o20000;

    const BASE_MASK: u16 = 0o77;
    const QUALIFIERS: [(u16, char); 8] = [
        (Self::ENERGY, 'E'),
        (Self::NO_ENERGY, 'N'),
        (Self::DELTA, 'D'),
        (Self::ACCEL, 'A'),
        (Self::COMPRESSED, 'C'),
        (Self::ZERO_MEAN, 'Z'),
        (Self::CHECKSUM, 'K'),
        (Self::ZEROTH, 'O'),
    ];

    /// Wrap a raw kind code
    pub fn from_code(code: u16) -> Self {
        HtkKind(code)
    }

    /// Raw kind code
    pub fn code(&self) -> u16 {
        self.0
    }

    /// Base parameterization (low six bits)
    pub fn base(&self) -> u16 {
        self.0 & Self::BASE_MASK
    }

    /// HTK name of the base parameterization
    pub fn base_name(&self) -> &'static str {
        match self.base() {
            0 => "WAVEFORM",
            1 => "LPC",
            2 => "LPREFC",
            3 => "LPCEPSTRA",
            4 => "LPDELCEP",
            5 => "IREFC",
            6 => "MFCC",
            7 => "FBANK",
            8 => "MELSPEC",
            9 => "USER",
            10 => "DISCRETE",
            11 => "PLP",
            _ => "ANON",
        }
    }

    /// True when qualifier bit `bit` is set
    pub fn has(&self, bit: u16) -> bool {
        self.0 & bit != 0
    }

    /// Pure waveform samples rather than parameter vectors
    pub fn is_waveform(&self) -> bool {
        self.base() == 0
    }

    /// Feature flags implied by the qualifiers
    pub fn flags(&self) -> FeatureFlags {
        FeatureFlags::from_qualifiers(
            self.has(Self::ENERGY),
            self.has(Self::DELTA),
            self.has(Self::ACCEL),
            self.has(Self::NO_ENERGY),
        )
    }
}

impl fmt::Display for HtkKind {
    /// `MFCC_E_D`-style name
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())?;
        for (bit, letter) in Self::QUALIFIERS {
            if self.has(bit) {
                write!(f, "_{letter}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct RawHeader {
    frames: i32,
    period: i32,
    bytes: i16,
    kind: HtkKind,
}

impl RawHeader {
    fn parse(head: &[u8], endian: Endian) -> Result<Self, DecodeError> {
        let mut r = EndianReader::new(head, endian);
        Ok(Self {
            frames: r.read_i32()?,
            period: r.read_i32()?,
            bytes: r.read_i16()?,
            kind: HtkKind::from_code(r.read_i16()? as u16),
        })
    }

    /// Header fields agree with each other and with the file length
    fn check(&self, len: u64) -> Result<(), DecodeError> {
        if self.frames < 0 {
            return Err(wrong_header(format!("negative frame count {}", self.frames)));
        }
        if self.period <= 0 {
            return Err(wrong_header(format!("sampling period {}", self.period)));
        }
        if self.bytes <= 0 {
            return Err(wrong_header(format!("{} bytes per frame", self.bytes)));
        }
        if self.kind.has(HtkKind::COMPRESSED) {
            // compressed payloads carry scale/offset vectors before the frames
            return Ok(());
        }
        // waveform samples are 16-bit
        if !self.kind.is_waveform() && self.bytes % 4 != 0 {
            return Err(wrong_header(format!(
                "{} bytes per frame is not a whole number of 4-byte values",
                self.bytes
            )));
        }
        let need = self.frames as u64 * self.bytes as u64;
        let payload = len - HEADER_LEN as u64;
        if need > payload {
            return Err(wrong_header(format!(
                "{} frames of {} bytes need {need} bytes but {payload} follow the header",
                self.frames, self.bytes
            )));
        }
        Ok(())
    }
}

fn wrong_header(detail: String) -> DecodeError {
    DecodeError::invalid(format!("Wrong header: {detail}"))
}

/// HTK header layout
pub(crate) struct Htk {
    endianness: Endianness,
    vect_size: Option<usize>,
    kind: Option<HtkKind>,
}

impl Htk {
    fn byte_order(&self, head: &[u8], len: u64) -> Result<Endian, DecodeError> {
        let native = Endian::Big;
        match self.endianness {
            Endianness::Big => Ok(Endian::Big),
            Endianness::Little => Ok(Endian::Little),
            Endianness::Auto => {
                if RawHeader::parse(head, native)?.check(len).is_ok() {
                    return Ok(native);
                }
                let swapped = native.swapped();
                if RawHeader::parse(head, swapped)?.check(len).is_ok() {
                    debug!("HTK header is only consistent as {swapped:?}");
                    return Ok(swapped);
                }
                Ok(native)
            }
        }
    }
}

impl Layout for Htk {
    const NAME: &'static str = "HTK";

    fn header_len(&self) -> usize {
        HEADER_LEN
    }

    fn decode(&mut self, _file: &Path, head: &[u8], len: u64) -> Result<Decoded, DecodeError> {
        let endian = self.byte_order(head, len)?;
        let raw = RawHeader::parse(head, endian)?;
        raw.check(len)?;
        if raw.kind.is_waveform() {
            return Err(DecodeError::Unsupported(format!(
                "HTK parameter kind {} holds waveform samples",
                raw.kind
            )));
        }

        let vect_size = raw.bytes as usize / 4;
        if let Some(pinned) = self.vect_size {
            if pinned != vect_size {
                return Err(wrong_header(format!(
                    "vector size {vect_size} does not match the configured {pinned}"
                )));
            }
        }

        self.kind = Some(raw.kind);
        Ok(Decoded {
            header: FeatureHeader {
                frame_count: raw.frames as u64,
                vect_size,
                sample_rate: PERIOD_UNITS_PER_SECOND / f64::from(raw.period),
                flags: raw.kind.flags(),
            },
            endian,
        })
    }

    fn check_frames(&self) -> Result<(), DecodeError> {
        match self.kind {
            Some(kind) if kind.has(HtkKind::COMPRESSED) => Err(DecodeError::Unsupported(format!(
                "compressed HTK frames ({kind}) are not supported"
            ))),
            _ => Ok(()),
        }
    }
}

/// Reader for HTK parameter files
pub struct HtkReader<S: ByteSource = FileSource> {
    stream: FeatureStream<S, Htk>,
}

impl HtkReader<FileSource> {
    /// Reader for feature file `name`, located with the configured feature
    /// search path and extension
    pub fn new(name: &str, config: &Config) -> Self {
        Self::from_source(FileSource::new(config.feature_load_path(name)), config)
    }
}

impl<S: ByteSource> HtkReader<S> {
    /// Reader over an already located source; nothing is read until the
    /// first accessor call
    pub fn from_source(source: S, config: &Config) -> Self {
        let layout = Htk {
            endianness: config.load_feature_file_endianness,
            vect_size: config.load_feature_file_vect_size,
            kind: None,
        };
        Self {
            stream: FeatureStream::new(source, layout),
        }
    }

    /// Parameter kind from the header
    pub fn parameter_kind(&mut self) -> Result<HtkKind, PersistError> {
        self.stream.header()?;
        self.stream
            .layout
            .kind
            .ok_or_else(|| PersistError::structural(self.stream.name(), None, "Wrong header"))
    }
}

feature_reader!(HtkReader);
