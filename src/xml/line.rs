use std::collections::VecDeque;
use std::io::{self, BufRead, Read};

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Buffered reader that remembers where newlines were consumed so that a
/// byte position reported by the XML reader can be turned into a line number.
///
/// Only newlines ahead of the last queried position are kept, so memory is
/// bounded by the read-ahead, not by the file length.
pub(crate) struct LineTracker<R> {
    inner: R,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    consumed: u64,
    pending: VecDeque<u64>,
    line: u64,
}

impl<R: Read> LineTracker<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; DEFAULT_BUFFER_SIZE].into_boxed_slice(),
            pos: 0,
            filled: 0,
            consumed: 0,
            pending: VecDeque::new(),
            line: 1,
        }
    }

    /// 1-based line holding the byte at `position`
    pub(crate) fn line_at(&mut self, position: u64) -> u64 {
        while let Some(&offset) = self.pending.front() {
            if offset >= position {
                break;
            }
            self.pending.pop_front();
            self.line += 1;
        }
        self.line
    }
}

impl<R: Read> Read for LineTracker<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for LineTracker<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.filled {
            self.filled = loop {
                match self.inner.read(&mut self.buf) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            self.pos = 0;
        }
        Ok(&self.buf[self.pos..self.filled])
    }

    fn consume(&mut self, amt: usize) {
        let end = (self.pos + amt).min(self.filled);
        for (i, byte) in self.buf[self.pos..end].iter().enumerate() {
            if *byte == b'\n' {
                self.pending.push_back(self.consumed + i as u64);
            }
        }
        self.consumed += (end - self.pos) as u64;
        self.pos = end;
    }
}
