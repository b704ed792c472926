use thiserror::Error;

use crate::reader::OutOfInput;

/// The ways a frame can be structurally damaged beyond decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    #[error("wrong magic number in frame header: {0:08x}")]
    WrongMagic(u32),
    #[error("frame version {0} (only version 1 is defined)")]
    BadVersion(u8),
    #[error("reserved bits in flags set")]
    ReservedFlagBits,
    #[error("reserved bits in bd set")]
    ReservedBdBits,
    #[error("the header checksum was invalid")]
    BadHeaderChecksum,
    #[error("match offset {offset} with only {available} bytes of history")]
    BadMatchOffset { offset: usize, available: usize },
    #[error("header declared {declared} content bytes but the frame decoded to {actual}")]
    WrongContentSize { declared: u64, actual: u64 },
}

/// Valid corners of the format that this decoder deliberately does not handle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    #[error("the frame wants a preset dictionary")]
    DictionaryId,
    #[error("the declared content size does not fit in memory on this platform")]
    ContentSizeRange,
    #[error("a literal or match length does not fit in usize")]
    LengthOverflow,
}

/// Errors when decompressing an LZ4 frame.
///
/// Every error is terminal: no partial output is handed out, with the one
/// exception of a failed content checksum, which carries the decoded bytes
/// for callers that want to salvage them anyway.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecompressError {
    /// The input ended before the frame did.
    #[error("input ended before the frame did")]
    Truncated,
    /// The frame violates the format and cannot be decoded.
    #[error("corrupted frame: {0}")]
    Corrupted(#[from] Corruption),
    /// An XXH32 integrity check over a block or the whole content failed.
    #[error("checksum mismatch: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        stored: u32,
        computed: u32,
        /// The fully decoded content, present when the frame-trailing
        /// content checksum is the one that failed.
        content: Option<Vec<u8>>,
    },
    /// The frame is well-formed but uses a feature this decoder does not implement.
    #[error("unsupported feature: {0}")]
    Unsupported(#[from] Unsupported),
}

impl From<OutOfInput> for DecompressError {
    fn from(_: OutOfInput) -> Self {
        DecompressError::Truncated
    }
}
