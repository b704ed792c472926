//! The LZ4 frame format.
//!
//! An lz4-compressed file typically consists of a single frame: a magic
//! number, a checksummed descriptor, a sequence of data blocks, an end
//! mark, and an optional checksum over the whole content. Blocks are
//! either LZ4-compressed or stored verbatim, and may be allowed to
//! reference the output of the blocks before them.

use std::cmp;
use std::convert::TryFrom;
use std::hash::Hasher;

use fehler::{throw, throws};
use twox_hash::XxHash32;

use crate::block::decompress_block;
use crate::error::{Corruption, DecompressError, Unsupported};
use crate::header::{BlockDescriptor, Flags};
use crate::reader::SliceReader;

/// The four magic bytes at the start of every LZ4 frame (little endian).
pub const MAGIC: u32 = 0x184D2204;
/// The frame format sets the high bit of a block mark to indicate that the data was stored uncompressed.
const UNCOMPRESSED: u32 = 1 << 31;
/// Dependent blocks may reference at most this much of the preceding
/// output. Offsets are 16 bits on the wire, so the bound holds without the
/// decoder ever discarding history.
pub const WINDOW_SIZE: usize = 64 * 1024;
/// Magic, FLG, BD, header checksum and EndMark: no frame is shorter.
const MIN_FRAME_SIZE: usize = 11;

fn xxh32(data: &[u8]) -> u32 {
    let mut hasher = XxHash32::with_seed(0);
    hasher.write(data);
    hasher.finish() as u32
}

/// Decoder for a single LZ4 frame held in memory.
///
/// Parsing the descriptor happens in `new`; everything after it (blocks,
/// end mark, content checksum) happens in `decompress`.
pub struct FrameDecoder<'a> {
    reader: SliceReader<'a>,
    flags: Flags,
    content_size: Option<u64>,
}

impl<'a> FrameDecoder<'a> {
    /// Parse and validate the frame descriptor, consuming it.
    #[throws(DecompressError)]
    pub fn new(input: &'a [u8]) -> Self {
        if input.len() < MIN_FRAME_SIZE {
            throw!(DecompressError::Truncated);
        }

        let mut reader = SliceReader::new(input);
        let magic = reader.read_u32()?;
        if magic != MAGIC {
            throw!(DecompressError::Corrupted(Corruption::WrongMagic(magic)));
        }

        let descriptor_start = reader.offset();
        let flags = Flags::parse(reader.read_u8()?)?;
        BlockDescriptor::parse(reader.read_u8()?)?;

        let content_size = if flags.content_size() {
            // the size itself, the header checksum and an EndMark must all
            // still be there
            if reader.remaining() < 8 + 1 + 4 {
                throw!(DecompressError::Truncated);
            }
            let declared = reader.read_u64()?;
            if usize::try_from(declared).is_err() {
                throw!(DecompressError::Unsupported(Unsupported::ContentSizeRange));
            }
            Some(declared)
        } else {
            None
        };

        if flags.dictionary_id() {
            throw!(DecompressError::Unsupported(Unsupported::DictionaryId));
        }

        // the checksum byte is the second byte of the hash over the raw
        // descriptor, magic excluded
        let descriptor = &input[descriptor_start..reader.offset()];
        let stored = reader.read_u8()?;
        let computed = (xxh32(descriptor) >> 8) as u8;
        if stored != computed {
            throw!(DecompressError::Corrupted(Corruption::BadHeaderChecksum));
        }

        FrameDecoder { reader, flags, content_size }
    }

    /// The content size declared in the descriptor, if any.
    pub fn content_size(&self) -> Option<u64> {
        self.content_size
    }

    /// Decode every block, verify the trailer, and return the content.
    #[throws(DecompressError)]
    pub fn decompress(mut self) -> Vec<u8> {
        // The declared size is a reservation hint only; cap what a header
        // can make us allocate by the best ratio the format can express.
        let mut output = match self.content_size {
            Some(declared) => {
                let plausible = (self.reader.remaining() as u64).saturating_mul(255);
                Vec::with_capacity(cmp::min(declared, plausible) as usize)
            }
            None => Vec::new(),
        };

        loop {
            let mark = self.reader.read_u32()?;
            if mark == 0 {
                break;
            }
            let uncompressed = mark & UNCOMPRESSED != 0;
            let block_size = (mark & !UNCOMPRESSED) as usize;

            // the payload, its optional checksum, and at least an EndMark
            let checksum_size = if self.flags.block_checksums() { 4 } else { 0 };
            if self.reader.remaining() < block_size + checksum_size + 4 {
                throw!(DecompressError::Truncated);
            }

            let payload = self.reader.take(block_size)?;

            if self.flags.block_checksums() {
                let stored = self.reader.read_u32()?;
                let computed = xxh32(payload);
                if stored != computed {
                    throw!(DecompressError::ChecksumMismatch { stored, computed, content: None });
                }
            }

            if uncompressed {
                output.extend_from_slice(payload);
            } else {
                let window_base = if self.flags.independent_blocks() {
                    output.len()
                } else {
                    0
                };
                decompress_block(payload, &mut output, window_base)?;
            }
        }

        if let Some(declared) = self.content_size {
            if output.len() as u64 != declared {
                throw!(DecompressError::Corrupted(Corruption::WrongContentSize {
                    declared,
                    actual: output.len() as u64,
                }));
            }
        }

        if self.flags.content_checksum() {
            let stored = self.reader.read_u32()?;
            let computed = xxh32(&output);
            if stored != computed {
                throw!(DecompressError::ChecksumMismatch {
                    stored,
                    computed,
                    content: Some(output),
                });
            }
        }

        output
    }
}

/// Decompress a single LZ4 frame.
///
/// Bytes after the frame's end are ignored; decoding is framed by the
/// frame's own end mark, not by the length of `input`.
#[throws(DecompressError)]
pub fn decompress_frame(input: &[u8]) -> Vec<u8> {
    FrameDecoder::new(input)?.decompress()?
}
