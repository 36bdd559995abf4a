//! Byte cursor over an RTF input stream.
//!
//! The parser is a single forward pass over a reader. Look-ahead is handled
//! by pushing bytes back onto a small stack instead of seeking.

use super::error::RtfResult;
use smallvec::SmallVec;
use std::io::{BufRead, ErrorKind};

/// Buffered byte cursor with push-back.
pub(crate) struct Source<R> {
    reader: R,
    /// Pushed-back bytes, last in first out
    pushback: SmallVec<[u8; 8]>,
    /// Number of bytes consumed so far
    position: u64,
}

impl<R: BufRead> Source<R> {
    /// Create a cursor over a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pushback: SmallVec::new(),
            position: 0,
        }
    }

    /// Byte offset of the next byte to be read.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the next byte, or `None` at end of input.
    pub fn next_byte(&mut self) -> RtfResult<Option<u8>> {
        if let Some(byte) = self.pushback.pop() {
            self.position += 1;
            return Ok(Some(byte));
        }

        loop {
            let next = match self.reader.fill_buf() {
                Ok(buf) => buf.first().copied(),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if next.is_some() {
                self.reader.consume(1);
                self.position += 1;
            }
            return Ok(next);
        }
    }

    /// Push a byte back so that the next read returns it.
    #[inline]
    pub fn unread(&mut self, byte: u8) {
        self.pushback.push(byte);
        self.position = self.position.saturating_sub(1);
    }

    /// Skip up to `count` raw bytes. Returns the number actually skipped.
    pub fn skip_bytes(&mut self, count: usize) -> RtfResult<usize> {
        let mut skipped = 0;

        while skipped < count && self.pushback.pop().is_some() {
            skipped += 1;
        }

        while skipped < count {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf.len(),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if available == 0 {
                break;
            }
            let take = available.min(count - skipped);
            self.reader.consume(take);
            skipped += take;
        }

        self.position += skipped as u64;
        Ok(skipped)
    }

    /// Consume bytes up to and including the first occurrence of any of the
    /// three given bytes, returning the byte found. Returns `None` when the
    /// input ends first.
    pub fn scan_to_any(&mut self, a: u8, b: u8, c: u8) -> RtfResult<Option<u8>> {
        while let Some(byte) = self.pushback.pop() {
            self.position += 1;
            if byte == a || byte == b || byte == c {
                return Ok(Some(byte));
            }
        }

        loop {
            let (consumed, found) = match self.reader.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => match memchr::memchr3(a, b, c, buf) {
                    Some(index) => (index + 1, Some(buf[index])),
                    None => (buf.len(), None),
                },
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.reader.consume(consumed);
            self.position += consumed as u64;
            if found.is_some() {
                return Ok(found);
            }
        }
    }
}
