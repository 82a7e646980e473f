use crate::error::{Error, Result};

/// The decompression "dictionary" (sliding window) for a single, fully
/// buffered XZ block.
///
/// Unlike a streaming decoder, which needs a private circular buffer that
/// it periodically flushes into caller-supplied chunks, this decoder's
/// entire output fits in memory at once, so the dictionary writes directly
/// into the caller's output slice. There is no wraparound: `write_pos` only
/// ever grows.
pub(crate) struct Dictionary<'a> {
    buf: &'a mut [u8],
    write_pos: usize,
    limit: usize,
}

impl<'a> Dictionary<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            write_pos: 0,
            limit: 0,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.write_pos
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Raises the limit by `n` bytes past the current write position.
    pub(crate) fn set_limit(&mut self, n: usize) -> Result<()> {
        let limit = self
            .write_pos
            .checked_add(n)
            .ok_or(Error::Capacity("chunk size overflow"))?;
        if limit > self.buf.len() {
            return Err(Error::Capacity("chunk exceeds output buffer"));
        }
        self.limit = limit;
        Ok(())
    }

    pub(crate) fn has_space(&self) -> bool {
        self.write_pos < self.limit
    }

    pub(crate) fn remaining_in_chunk(&self) -> usize {
        self.limit - self.write_pos
    }

    /// Byte at `write_pos - 1 - distance`, the LZMA "previous byte" used for
    /// literal context and matched-literal decoding.
    pub(crate) fn get_byte(&self, distance: usize) -> Result<u8> {
        if distance >= self.write_pos {
            return Err(Error::LzmaSemantic("match distance exceeds history"));
        }
        Ok(self.buf[self.write_pos - 1 - distance])
    }

    pub(crate) fn put(&mut self, byte: u8) -> Result<()> {
        if self.write_pos >= self.limit {
            return Err(Error::Capacity("write past chunk limit"));
        }
        self.buf[self.write_pos] = byte;
        self.write_pos += 1;
        Ok(())
    }

    /// Copies `length` bytes from `distance + 1` bytes back, one byte at a
    /// time. Overlapping copies (`distance < length`) are legal and must
    /// observe bytes written earlier in the same call.
    pub(crate) fn copy_match(&mut self, distance: usize, length: usize) -> Result<()> {
        if distance >= self.write_pos {
            return Err(Error::LzmaSemantic("match distance exceeds history"));
        }
        if length > self.remaining_in_chunk() {
            return Err(Error::Capacity("match overruns chunk limit"));
        }
        for _ in 0..length {
            let src = self.buf[self.write_pos - 1 - distance];
            self.buf[self.write_pos] = src;
            self.write_pos += 1;
        }
        Ok(())
    }

    pub(crate) fn copy_raw(&mut self, src: &[u8]) -> Result<()> {
        if src.len() > self.remaining_in_chunk() {
            return Err(Error::Capacity("uncompressed chunk overruns limit"));
        }
        self.buf[self.write_pos..self.write_pos + src.len()].copy_from_slice(src);
        self.write_pos += src.len();
        Ok(())
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.write_pos == self.limit
    }
}
