//! XZ container parsing: stream header, block header, block body, index,
//! and stream footer for a single-stream, single-block, LZMA2-only file.

use crate::cursor::InputCursor;
use crate::dict::Dictionary;
use crate::error::{Error, Result};
use crate::lzma2;

const CRC32: crc::Crc<u32, crc::Table<16>> =
    crc::Crc::<u32, crc::Table<16>>::new(&crc::CRC_32_ISO_HDLC);

const STREAM_MAGIC: [u8; 6] = [0xFD, b'7', b'z', b'X', b'Z', 0x00];
const FOOTER_MAGIC: [u8; 2] = [b'Y', b'Z'];

const CHECK_NONE: u8 = 0x00;
const CHECK_CRC32: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckType {
    None,
    Crc32,
}

fn crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

/// Decodes a single-block XZ stream, writing the decompressed payload into
/// `output`. Returns the exact number of bytes written.
pub(crate) fn decode(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let mut cursor = InputCursor::new(input);

    let check = decode_stream_header(input, &mut cursor)?;

    let block_header_start = cursor.offset();
    decode_block_header(input, &mut cursor, output.len())?;
    let header_size = cursor.offset() - block_header_start;

    let block_body_start = cursor.offset();
    let mut dict = Dictionary::new(output);
    let written = lzma2::decode_stream(&mut cursor, &mut dict)?;

    cursor.align4()?;
    let unpadded_block_size = header_size + (cursor.offset() - block_body_start);

    let checksum_size = match check {
        CheckType::None => 0,
        CheckType::Crc32 => 4,
    };
    let checksum_bytes = cursor.seek(checksum_size)?;
    if check == CheckType::Crc32 {
        let expected = u32::from_le_bytes([
            checksum_bytes[0],
            checksum_bytes[1],
            checksum_bytes[2],
            checksum_bytes[3],
        ]);
        if crc32(&output[..written]) != expected {
            return Err(Error::Integrity);
        }
    }

    let index_size = decode_index(
        input,
        &mut cursor,
        unpadded_block_size + checksum_size,
        written,
    )?;
    decode_stream_footer(input, &mut cursor, check, index_size)?;

    Ok(written)
}

/// Walks the container without touching the LZMA2/range decoders, to learn
/// the exact uncompressed size (sizing mode).
pub(crate) fn decoded_size(input: &[u8]) -> Result<usize> {
    let mut cursor = InputCursor::new(input);
    decode_stream_header(input, &mut cursor)?;
    decode_block_header(input, &mut cursor, usize::MAX)?;
    lzma2::sizing_walk(&mut cursor)
}

fn decode_stream_header(input: &[u8], cursor: &mut InputCursor) -> Result<CheckType> {
    let start = cursor.offset();
    let header = cursor.seek(12)?;
    if header[0..6] != STREAM_MAGIC {
        return Err(Error::Framing("bad stream header magic"));
    }
    let flags_byte0 = header[6];
    let flags_byte1 = header[7];
    if flags_byte0 != 0 {
        return Err(Error::Framing("stream header flags byte 0 must be zero"));
    }
    let check = match flags_byte1 {
        CHECK_NONE => CheckType::None,
        CHECK_CRC32 => CheckType::Crc32,
        _ => return Err(Error::Framing("unsupported check type")),
    };
    let crc = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
    if crc32(&input[start + 6..start + 8]) != crc {
        return Err(Error::Integrity);
    }
    Ok(check)
}

/// Returns the maximum output size the block's declared dictionary size
/// permits.
fn decode_block_header(
    input: &[u8],
    cursor: &mut InputCursor,
    output_capacity: usize,
) -> Result<usize> {
    let start = cursor.offset();
    let size_byte = cursor.read()?;
    let header_size = (size_byte as usize + 1) * 4;
    if header_size != 12 {
        return Err(Error::Framing("block header size must be 12"));
    }

    let flags = cursor.read()?;
    if flags != 0 {
        return Err(Error::Framing(
            "block header flags must be zero (lzma2-only, single filter)",
        ));
    }
    let filter_id = cursor.read()?;
    if filter_id != 0x21 {
        return Err(Error::Framing("only the lzma2 filter id is supported"));
    }
    let props_size = cursor.read()?;
    if props_size != 1 {
        return Err(Error::Framing("lzma2 filter properties must be one byte"));
    }
    let dict_prop = cursor.read()?;
    if dict_prop > 39 {
        return Err(Error::Framing(
            "lzma2 dictionary size property out of range",
        ));
    }
    let dict_size = (2 + (dict_prop as usize & 1)) << ((dict_prop as usize >> 1) + 11);
    if dict_size > output_capacity {
        return Err(Error::Capacity("dictionary size exceeds output buffer"));
    }

    let consumed = cursor.offset() - start;
    if consumed > header_size {
        return Err(Error::Framing("block header shorter than declared size"));
    }
    // Any remaining bytes up to the declared header size (beyond the one
    // mandatory filter entry) must be present before the trailing CRC-32.
    cursor.seek(header_size - consumed - 4)?;
    let crc_bytes = cursor.seek(4)?;
    let crc = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
    if crc32(&input[start..start + header_size - 4]) != crc {
        return Err(Error::Integrity);
    }

    Ok(dict_size)
}

/// Returns the index's own size (including its trailing CRC-32), used by
/// the footer's `backward_size` cross-check.
fn decode_index(
    input: &[u8],
    cursor: &mut InputCursor,
    expected_unpadded: usize,
    expected_uncompressed: usize,
) -> Result<usize> {
    let index_start = cursor.offset();

    if cursor.read()? != 0 {
        return Err(Error::Framing("index must start with a null byte"));
    }
    let block_count = decode_vli(cursor)?;
    if block_count != 1 {
        return Err(Error::Framing("only single-block streams are supported"));
    }
    let unpadded_size = decode_vli(cursor)?;
    if unpadded_size != expected_unpadded as u64 {
        return Err(Error::Framing("index unpadded block size does not match"));
    }
    let uncompressed_size = decode_vli(cursor)?;
    if uncompressed_size != expected_uncompressed as u64 {
        return Err(Error::Framing(
            "index uncompressed block size does not match",
        ));
    }
    cursor.align4()?;

    let index_end = cursor.offset();
    let crc_bytes = cursor.seek(4)?;
    let crc = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
    if crc32(&input[index_start..index_end]) != crc {
        return Err(Error::Integrity);
    }

    Ok(index_end - index_start + 4)
}

fn decode_stream_footer(
    input: &[u8],
    cursor: &mut InputCursor,
    check: CheckType,
    index_size: usize,
) -> Result<()> {
    let start = cursor.offset();
    let footer = cursor.seek(12)?;
    let crc = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
    let backward_size = u32::from_le_bytes([footer[4], footer[5], footer[6], footer[7]]);
    let flags0 = footer[8];
    let flags1 = footer[9];
    if footer[10..12] != FOOTER_MAGIC {
        return Err(Error::Framing("bad stream footer magic"));
    }
    if flags0 != 0 {
        return Err(Error::Framing("stream footer flags byte 0 must be zero"));
    }
    let footer_check = match flags1 {
        CHECK_NONE => CheckType::None,
        CHECK_CRC32 => CheckType::Crc32,
        _ => return Err(Error::Framing("unsupported check type in footer")),
    };
    if footer_check != check {
        return Err(Error::Framing(
            "stream footer check type does not match stream header",
        ));
    }
    if (backward_size as usize + 1) * 4 != index_size {
        return Err(Error::Framing("backward size does not match index size"));
    }
    if crc32(&input[start + 4..start + 10]) != crc {
        return Err(Error::Integrity);
    }
    Ok(())
}

fn decode_vli(cursor: &mut InputCursor) -> Result<u64> {
    let mut byte = cursor.read()?;
    let mut value = (byte & 0x7F) as u64;
    let mut bit_pos = 7u32;
    while byte & 0x80 != 0 {
        byte = cursor.read()?;
        if bit_pos >= 9 * 7 || byte == 0 {
            return Err(Error::Framing("invalid variable-length integer"));
        }
        value |= ((byte & 0x7F) as u64) << bit_pos;
        bit_pos += 7;
    }
    Ok(value)
}
