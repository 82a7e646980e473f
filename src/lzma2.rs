//! LZMA2 chunk framing: dispatches control bytes to either a raw copy into
//! the dictionary or a run of the LZMA sequence decoder, honoring chunk
//! size declarations and per-chunk reset modes.

use crate::consts::LZMA_MAX_SEQUENCE_SIZE;
use crate::cursor::InputCursor;
use crate::dict::Dictionary;
use crate::error::{Error, Result};
use crate::lzma::{LzmaDecoder, Properties};
use crate::range_dec::RangeDecoder;

/// Control byte `0x00`: end of LZMA2 stream.
const CONTROL_END: u8 = 0x00;
/// Control bytes `0x01`/`0x02`: uncompressed chunk, with/without dict reset.
const CONTROL_UNCOMPRESSED_RESET: u8 = 0x01;
const CONTROL_UNCOMPRESSED_NO_RESET: u8 = 0x02;
/// `0x80` and above: LZMA chunk. Bits 5-6 of the control byte pick the
/// reset mode; bit 7 set always means a full reset (new properties byte).
const CONTROL_LZMA: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResetMode {
    NoReset,
    StateReset,
    PropertyReset,
    FullReset,
}

fn reset_mode(control: u8) -> ResetMode {
    match (control >> 5) & 0x3 {
        0 => ResetMode::NoReset,
        1 => ResetMode::StateReset,
        2 => ResetMode::PropertyReset,
        _ => ResetMode::FullReset,
    }
}

/// Decodes one LZMA2 stream (the body of a single XZ block) into `dict`,
/// stopping at the `0x00` end marker. Returns the total number of bytes
/// written, which the caller cross-checks against the block's declared
/// uncompressed size.
pub(crate) fn decode_stream(cursor: &mut InputCursor, dict: &mut Dictionary) -> Result<usize> {
    let start = dict.pos();
    let mut lzma: Option<LzmaDecoder> = None;

    loop {
        let control = cursor.read()?;
        if control == CONTROL_END {
            break;
        }

        if control == CONTROL_UNCOMPRESSED_RESET || control == CONTROL_UNCOMPRESSED_NO_RESET {
            decode_uncompressed_chunk(cursor, dict)?;
            continue;
        }

        if control < CONTROL_LZMA {
            return Err(Error::Framing("invalid lzma2 control byte"));
        }

        decode_lzma_chunk(cursor, dict, control, &mut lzma)?;
    }

    Ok(dict.pos() - start)
}

/// Walks control bytes without touching the range or LZMA decoders, only
/// to learn the total uncompressed size (sizing mode).
pub(crate) fn sizing_walk(cursor: &mut InputCursor) -> Result<usize> {
    let mut total = 0usize;
    loop {
        let control = cursor.read()?;
        if control == CONTROL_END {
            break;
        }
        if control == CONTROL_UNCOMPRESSED_RESET || control == CONTROL_UNCOMPRESSED_NO_RESET {
            let size_bytes = cursor.seek(2)?;
            let uncompressed_size = u16::from_be_bytes([size_bytes[0], size_bytes[1]]) as usize + 1;
            cursor.seek(uncompressed_size)?;
            total += uncompressed_size;
            continue;
        }
        if control < CONTROL_LZMA {
            return Err(Error::Framing("invalid lzma2 control byte"));
        }
        let info = cursor.seek(4)?;
        let uncompressed_size =
            (((control & 0x1F) as usize) << 16 | (info[0] as usize) << 8 | info[1] as usize) + 1;
        let compressed_size = ((info[2] as usize) << 8 | info[3] as usize) + 1;
        if reset_mode(control) == ResetMode::FullReset {
            cursor.seek(1)?;
        }
        cursor.seek(compressed_size)?;
        total += uncompressed_size;
    }
    Ok(total)
}

fn decode_uncompressed_chunk(cursor: &mut InputCursor, dict: &mut Dictionary) -> Result<()> {
    let size_bytes = cursor.seek(2)?;
    let size = u16::from_be_bytes([size_bytes[0], size_bytes[1]]) as usize + 1;
    let data = cursor.seek(size)?;
    dict.set_limit(size)?;
    dict.copy_raw(data)?;
    Ok(())
}

fn decode_lzma_chunk(
    cursor: &mut InputCursor,
    dict: &mut Dictionary,
    control: u8,
    lzma: &mut Option<LzmaDecoder>,
) -> Result<()> {
    let info = cursor.seek(4)?;
    let uncompressed_size =
        (((control & 0x1F) as usize) << 16 | (info[0] as usize) << 8 | info[1] as usize) + 1;
    let compressed_size = ((info[2] as usize) << 8 | info[3] as usize) + 1;
    if compressed_size < LZMA_MAX_SEQUENCE_SIZE {
        return Err(Error::Framing("lzma2 chunk too small for one packet"));
    }

    let mode = reset_mode(control);
    match mode {
        ResetMode::FullReset => {
            let props_byte = cursor.read()?;
            let props = Properties::from_byte(props_byte)?;
            *lzma = Some(LzmaDecoder::new(props));
        }
        ResetMode::NoReset => {
            if lzma.is_none() {
                return Err(Error::Framing("lzma2 chunk with no prior full reset"));
            }
        }
        ResetMode::StateReset | ResetMode::PropertyReset => {
            return Err(Error::Framing(
                "lzma2 state/property reset is not supported",
            ));
        }
    }
    let decoder = lzma.as_mut().expect("reset handling guarantees a decoder");

    dict.set_limit(uncompressed_size)?;

    let body_start = cursor.offset();
    let mut rc = RangeDecoder::new(cursor)?;
    decoder.run(dict, &mut rc)?;

    if !rc.is_complete() {
        return Err(Error::RangeDesync("range decoder did not reach zero code"));
    }
    if rc.bytes_consumed() != compressed_size {
        return Err(Error::RangeDesync(
            "compressed size did not match bytes consumed",
        ));
    }
    if !dict.is_complete() {
        return Err(Error::LzmaSemantic(
            "chunk did not produce its declared uncompressed size",
        ));
    }
    debug_assert_eq!(cursor.offset(), body_start + compressed_size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_control_byte() {
        let data = [0x03u8];
        let mut cursor = InputCursor::new(&data);
        let mut out = [0u8; 4];
        let mut dict = Dictionary::new(&mut out);
        assert!(matches!(
            decode_stream(&mut cursor, &mut dict),
            Err(Error::Framing(_))
        ));
    }

    #[test]
    fn uncompressed_chunk_then_end() {
        // control 0x01, size-1 = 0x0002 (3 bytes), payload "abc", then 0x00
        let data = [0x01u8, 0x00, 0x02, b'a', b'b', b'c', 0x00];
        let mut cursor = InputCursor::new(&data);
        let mut out = [0u8; 8];
        let mut dict = Dictionary::new(&mut out);
        let written = decode_stream(&mut cursor, &mut dict).unwrap();
        assert_eq!(written, 3);
        assert_eq!(&out[..3], b"abc");
    }

    #[test]
    fn sizing_walk_matches_decode() {
        let data = [0x01u8, 0x00, 0x02, b'a', b'b', b'c', 0x00];
        let mut cursor = InputCursor::new(&data);
        let size = sizing_walk(&mut cursor).unwrap();
        assert_eq!(size, 3);
    }
}
