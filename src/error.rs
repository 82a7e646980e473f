use std::fmt;

/// Everything that can go wrong while decoding an XZ/LZMA2 stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A read or seek ran past the end of the input buffer.
    Truncation(&'static str),
    /// Magic bytes, flags, header sizes or filter ids were not among the
    /// accepted values.
    Framing(&'static str),
    /// The output buffer is too small, or a declared dictionary size
    /// exceeds it.
    Capacity(&'static str),
    /// The range decoder did not end in the expected state.
    RangeDesync(&'static str),
    /// A match distance, length, or properties byte violated an LZMA
    /// invariant.
    LzmaSemantic(&'static str),
    /// A CRC-32 check over a header, block, index, or footer failed.
    Integrity,
    /// A non-zero byte was found inside 4-byte alignment padding.
    Padding,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncation(msg) => write!(f, "truncated input: {msg}"),
            Error::Framing(msg) => write!(f, "invalid framing: {msg}"),
            Error::Capacity(msg) => write!(f, "insufficient capacity: {msg}"),
            Error::RangeDesync(msg) => write!(f, "range decoder desync: {msg}"),
            Error::LzmaSemantic(msg) => write!(f, "invalid lzma stream: {msg}"),
            Error::Integrity => write!(f, "checksum mismatch"),
            Error::Padding => write!(f, "non-zero padding byte"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
