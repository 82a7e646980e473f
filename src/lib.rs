//! Minimal decoder for XZ streams carrying a single LZMA2-filtered block.
//!
//! This crate decodes a single-stream, single-block XZ container (CRC-32 or
//! no block check, LZMA2 filter only) from a fully buffered input slice
//! into a caller-supplied output slice. It does not support multi-block
//! streams, BCJ/delta filters, or compression.

mod consts;
mod cursor;
mod dict;
mod error;
mod lzma;
mod lzma2;
mod range_dec;
mod xz;

pub use error::Error;
use error::Result;

use std::cell::Cell;

thread_local! {
    static LAST_CHECKSUM_ERROR: Cell<bool> = const { Cell::new(false) };
}

/// Decodes `input` into `output`.
///
/// When `output` is empty and `*output_size` is `0`, the call runs in
/// sizing mode: it returns `true` and sets `*output_size` to the exact
/// number of bytes the stream decodes to, without writing anything.
/// Otherwise `output` must be at least `*output_size` bytes, which must be
/// at least as large as the decoded payload; on success `*output_size` is
/// updated to the exact number of bytes written.
///
/// Returns `false` on any malformed input, in which case the contents of
/// `output` are unspecified up to `*output_size` bytes.
pub fn decode(input: &[u8], output: &mut [u8], output_size: &mut usize) -> bool {
    LAST_CHECKSUM_ERROR.with(|cell| cell.set(false));

    let result = if output.is_empty() && *output_size == 0 {
        xz::decoded_size(input).map(|size| {
            *output_size = size;
            size
        })
    } else {
        xz::decode(input, &mut output[..*output_size]).map(|written| {
            *output_size = written;
            written
        })
    };

    match result {
        Ok(_) => true,
        Err(err) => {
            if err == Error::Integrity {
                LAST_CHECKSUM_ERROR.with(|cell| cell.set(true));
            }
            false
        }
    }
}

/// Reports whether the most recent `decode` call on this thread failed
/// specifically because of a checksum mismatch, as opposed to any other
/// framing or semantic error.
pub fn last_checksum_error() -> bool {
    LAST_CHECKSUM_ERROR.with(|cell| cell.get())
}

/// `Result`-returning core, exposed for callers that prefer idiomatic Rust
/// error handling over the boolean ABI above.
pub fn decode_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    xz::decode(input, output)
}

/// `Result`-returning sizing query, the idiomatic counterpart of calling
/// [`decode`] with an empty output buffer.
pub fn decoded_size(input: &[u8]) -> Result<usize> {
    xz::decoded_size(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_checksum_error_false_before_any_call() {
        assert!(!last_checksum_error());
    }

    #[test]
    fn decode_rejects_garbage_input() {
        let input = [0u8; 4];
        let mut output = [0u8; 16];
        let mut size = 16usize;
        assert!(!decode(&input, &mut output, &mut size));
        assert!(!last_checksum_error());
    }
}
