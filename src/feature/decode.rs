use std::io::Read;
use std::path::Path;

use log::debug;

use super::FeatureHeader;
use crate::error::PersistError;
use crate::stream::{ByteSource, DecodeError, Endian, EndianReader};

/// Header outcome of one feature layout
pub(crate) struct Decoded {
    pub header: FeatureHeader,
    pub endian: Endian,
}

/// Header decoding for one feature file layout
pub(crate) trait Layout {
    /// Layout name used in logs
    const NAME: &'static str;

    /// Bytes before the first frame
    fn header_len(&self) -> usize;

    /// Decode `head` (exactly `header_len` bytes) of a file `len` bytes long
    fn decode(&mut self, file: &Path, head: &[u8], len: u64) -> Result<Decoded, DecodeError>;

    /// Whether the payload can be streamed as `f32` frames
    fn check_frames(&self) -> Result<(), DecodeError> {
        Ok(())
    }
}

struct Opened<R> {
    header: FeatureHeader,
    reader: EndianReader<R>,
    next: u64,
}

/// A feature source whose header is decoded on first use and cached until
/// [`FeatureStream::close`]
pub(crate) struct FeatureStream<S: ByteSource, L> {
    source: S,
    pub(crate) layout: L,
    opened: Option<Opened<S::Reader>>,
}

impl<S: ByteSource, L: Layout> FeatureStream<S, L> {
    pub(crate) fn new(source: S, layout: L) -> Self {
        Self {
            source,
            layout,
            opened: None,
        }
    }

    pub(crate) fn name(&self) -> &Path {
        self.source.name()
    }

    fn open(&mut self) -> Result<Opened<S::Reader>, PersistError> {
        let name = self.source.name();
        let len = self.source.len()?;
        let header_len = self.layout.header_len();
        if len < header_len as u64 {
            return Err(PersistError::structural(
                name,
                None,
                format!("Wrong header: {len} bytes is shorter than the {header_len}-byte {} header", L::NAME),
            ));
        }

        let mut input = self.source.open()?;
        let mut head = vec![0u8; header_len];
        input
            .read_exact(&mut head)
            .map_err(|e| DecodeError::from(e).into_persist(name))?;
        let Decoded { header, endian } = self
            .layout
            .decode(name, &head, len)
            .map_err(|e| e.into_persist(name))?;

        debug!(
            "Decoded {} header of {} ({:?}): {} frames of {} values at {} Hz, flags {}",
            L::NAME,
            name.display(),
            endian,
            header.frame_count,
            header.vect_size,
            header.sample_rate,
            header.flags
        );
        Ok(Opened {
            header,
            reader: EndianReader::new(input, endian),
            next: 0,
        })
    }

    fn ensure_open(&mut self) -> Result<&mut Opened<S::Reader>, PersistError> {
        let opened = match self.opened.take() {
            Some(opened) => opened,
            None => self.open()?,
        };
        Ok(self.opened.insert(opened))
    }

    pub(crate) fn header(&mut self) -> Result<FeatureHeader, PersistError> {
        Ok(self.ensure_open()?.header)
    }

    pub(crate) fn read_frame(&mut self, frame: &mut Vec<f32>) -> Result<bool, PersistError> {
        self.ensure_open()?;
        let name = self.source.name();
        self.layout.check_frames().map_err(|e| e.into_persist(name))?;
        let Some(opened) = self.opened.as_mut() else {
            return Ok(false);
        };
        if opened.next >= opened.header.frame_count {
            return Ok(false);
        }

        frame.clear();
        frame.reserve(opened.header.vect_size);
        for _ in 0..opened.header.vect_size {
            let value = opened
                .reader
                .read_f32()
                .map_err(|e| DecodeError::from(e).into_persist(name))?;
            frame.push(value);
        }
        opened.next += 1;
        Ok(true)
    }

    pub(crate) fn close(&mut self) {
        self.opened = None;
    }
}
