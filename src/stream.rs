//! Byte sources and endian-aware primitive reads/writes.
//!
//! Readers never touch `std::fs` directly: they open a [`ByteSource`], which
//! yields a buffered stream and the total length. Files use [`FileSource`];
//! tests and in-memory conversions use [`MemorySource`].

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::PersistError;

/// Something that can be opened as a buffered byte stream
pub trait ByteSource {
    /// Stream type produced by [`ByteSource::open`]
    type Reader: BufRead;

    /// Name used in diagnostics
    fn name(&self) -> &Path;

    /// Open a fresh stream positioned at the first byte
    fn open(&self) -> Result<Self::Reader, PersistError>;

    /// Total length in bytes
    fn len(&self) -> Result<u64, PersistError>;
}

/// A file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Bind to `path`; nothing is opened until [`ByteSource::open`]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ByteSource for FileSource {
    type Reader = BufReader<File>;

    fn name(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Self::Reader, PersistError> {
        let file = File::open(&self.path).map_err(|e| PersistError::io(&self.path, e))?;
        Ok(BufReader::new(file))
    }

    fn len(&self) -> Result<u64, PersistError> {
        std::fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| PersistError::io(&self.path, e))
    }
}

/// An in-memory buffer with a display name
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: PathBuf,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    /// Wrap `bytes` under the diagnostic name `name`
    pub fn new(name: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::from(bytes.into()),
        }
    }
}

impl ByteSource for MemorySource {
    type Reader = Cursor<Arc<[u8]>>;

    fn name(&self) -> &Path {
        &self.name
    }

    fn open(&self) -> Result<Self::Reader, PersistError> {
        Ok(Cursor::new(Arc::clone(&self.bytes)))
    }

    fn len(&self) -> Result<u64, PersistError> {
        Ok(self.bytes.len() as u64)
    }
}

/// Failures while decoding a binary layout
#[derive(Debug, thiserror::Error)]
pub(crate) enum DecodeError {
    #[error("unexpected end of data")]
    Truncated,

    #[error("{0} trailing bytes after the last field")]
    Trailing(u64),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Unsupported(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<crate::model::ModelError> for DecodeError {
    fn from(e: crate::model::ModelError) -> Self {
        DecodeError::Invalid(e.to_string())
    }
}

impl DecodeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        DecodeError::Invalid(message.into())
    }

    /// Attach the file name; short reads and bad encodings are structural
    pub(crate) fn into_persist(self, file: &Path) -> PersistError {
        match self {
            DecodeError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                PersistError::structural(file, None, DecodeError::Truncated.to_string())
            }
            DecodeError::Io(e) if e.kind() == io::ErrorKind::InvalidData => {
                PersistError::structural(file, None, e.to_string())
            }
            DecodeError::Io(e) => PersistError::io(file, e),
            DecodeError::Unsupported(message) => PersistError::unsupported(file, message),
            other => PersistError::structural(file, None, other.to_string()),
        }
    }
}

/// Bytes left to decode; sizes read from a header are checked against it
/// before anything is allocated
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    remaining: u64,
}

impl Budget {
    pub(crate) fn new(len: u64) -> Self {
        Self { remaining: len }
    }

    /// Reserve `count` items of `unit` bytes
    pub(crate) fn take(&mut self, count: u64, unit: u64) -> Result<(), DecodeError> {
        let need = count.checked_mul(unit).ok_or(DecodeError::Truncated)?;
        if need > self.remaining {
            return Err(DecodeError::Truncated);
        }
        self.remaining -= need;
        Ok(())
    }

    /// Error unless every byte has been reserved
    pub(crate) fn finish(&self) -> Result<(), DecodeError> {
        match self.remaining {
            0 => Ok(()),
            n => Err(DecodeError::Trailing(n)),
        }
    }
}

/// Byte order of a binary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    Little,
}

impl Endian {
    /// Order selected by a big-endian flag
    pub fn from_big(big: bool) -> Self {
        if big {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    /// The other byte order
    pub fn swapped(self) -> Self {
        match self {
            Endian::Big => Endian::Little,
            Endian::Little => Endian::Big,
        }
    }
}

macro_rules! endian_read {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $name(&mut self) -> io::Result<$ty> {
                match self.endian {
                    Endian::Big => self.inner.$name::<BigEndian>(),
                    Endian::Little => self.inner.$name::<LittleEndian>(),
                }
            }
        )*
    };
}

macro_rules! endian_write {
    ($($name:ident => $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $name(&mut self, value: $ty) -> io::Result<()> {
                match self.endian {
                    Endian::Big => self.inner.$name::<BigEndian>(value),
                    Endian::Little => self.inner.$name::<LittleEndian>(value),
                }
            }
        )*
    };
}

/// Reads fixed-width values in a byte order chosen at runtime
pub(crate) struct EndianReader<R> {
    inner: R,
    endian: Endian,
}

impl<R: Read> EndianReader<R> {
    pub(crate) fn new(inner: R, endian: Endian) -> Self {
        Self { inner, endian }
    }

    endian_read! {
        read_i16 => i16,
        read_u16 => u16,
        read_i32 => i32,
        read_u32 => u32,
        read_f32 => f32,
        read_f64 => f64,
    }

    pub(crate) fn read_u8(&mut self) -> io::Result<u8> {
        self.inner.read_u8()
    }

    pub(crate) fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)
    }
}

/// Writes fixed-width values in a byte order chosen at runtime
pub(crate) struct EndianWriter<W> {
    inner: W,
    endian: Endian,
}

impl<W: Write> EndianWriter<W> {
    pub(crate) fn new(inner: W, endian: Endian) -> Self {
        Self { inner, endian }
    }

    endian_write! {
        write_u32 => u32,
        write_f64 => f64,
    }

    pub(crate) fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.inner.write_u8(value)
    }

    pub(crate) fn write_len(&mut self, len: usize) -> io::Result<()> {
        let len = u32::try_from(len).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "length does not fit in 32 bits")
        })?;
        self.write_u32(len)
    }

    pub(crate) fn write_string(&mut self, value: &str) -> io::Result<()> {
        self.write_len(value.len())?;
        self.inner.write_all(value.as_bytes())
    }

    pub(crate) fn write_f64_slice(&mut self, values: &[f64]) -> io::Result<()> {
        values.iter().try_for_each(|v| self.write_f64(*v))
    }

    pub(crate) fn into_inner(self) -> W {
        self.inner
    }
}
