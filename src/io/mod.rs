//! Random-access input sources and the cursor the decoders read through.

mod local;

pub use local::LocalFileReader;

use crate::error::{Error, Result};

/// Trait for random access reading from a data source.
pub trait ReadAt {
    /// Read data at the specified offset into the buffer, returning the
    /// number of bytes read (0 at or past end of source).
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Get the total size of the data source.
    fn size(&self) -> u64;
}

impl ReadAt for &[u8] {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = self.len() as u64;
        if offset >= len {
            return Ok(0);
        }
        let avail = &self[offset as usize..];
        let n = avail.len().min(buf.len());
        buf[..n].copy_from_slice(&avail[..n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

impl ReadAt for Vec<u8> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        self.as_slice().read_at(offset, buf)
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

/// Seekable cursor over a [`ReadAt`] source.
///
/// All raw byte access in the crate goes through this type; offset and length
/// interpretation stays in the per-format decoders. Each cursor carries its
/// own position, so independent cursors over one source never interfere.
pub struct SourceCursor<'a, R: ReadAt> {
    reader: &'a R,
    pos: u64,
}

impl<'a, R: ReadAt> SourceCursor<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader, pos: 0 }
    }

    /// Move the cursor to an absolute offset.
    pub fn seek(&mut self, offset: u64) {
        self.pos = offset;
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total length of the underlying source.
    pub fn source_len(&self) -> u64 {
        self.reader.size()
    }

    /// Bytes between the current position and the end of the source.
    pub fn remaining(&self) -> u64 {
        self.reader.size().saturating_sub(self.pos)
    }

    /// Fill `buf` completely from the current position, advancing past it.
    ///
    /// Fails with [`Error::TruncatedSource`] if the source ends before the
    /// buffer is full; the cursor position is unchanged on failure.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut done = 0;
        while done < buf.len() {
            let n = self
                .reader
                .read_at(self.pos + done as u64, &mut buf[done..])?;
            if n == 0 {
                return Err(Error::TruncatedSource {
                    offset: self.pos,
                    wanted: buf.len(),
                });
            }
            done += n;
        }
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Read exactly `n` bytes from the current position into a new buffer.
    pub fn read_vec(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_and_advances() {
        let data: Vec<u8> = (0u8..16).collect();
        let mut cur = SourceCursor::new(&data);
        assert_eq!(cur.remaining(), 16);

        let head = cur.read_vec(4).unwrap();
        assert_eq!(head, &[0, 1, 2, 3]);
        assert_eq!(cur.position(), 4);
        assert_eq!(cur.remaining(), 12);

        cur.seek(14);
        let tail = cur.read_vec(2).unwrap();
        assert_eq!(tail, &[14, 15]);
        assert_eq!(cur.remaining(), 0);
    }

    #[test]
    fn cursor_fails_past_end_without_moving() {
        let data = vec![0u8; 8];
        let mut cur = SourceCursor::new(&data);
        cur.seek(6);

        match cur.read_vec(4) {
            Err(Error::TruncatedSource { offset, wanted }) => {
                assert_eq!(offset, 6);
                assert_eq!(wanted, 4);
            }
            other => panic!("expected TruncatedSource, got {other:?}"),
        }
        assert_eq!(cur.position(), 6);
    }

    #[test]
    fn slice_read_at_clamps_to_source() {
        let data: &[u8] = &[1, 2, 3];
        let mut buf = [0u8; 8];
        assert_eq!(data.read_at(1, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[2, 3]);
        assert_eq!(data.read_at(3, &mut buf).unwrap(), 0);
    }
}
