use bitflags::bitflags;
use fehler::{throw, throws};

use crate::error::Corruption;

bitflags! {
    /// The defined bits of the FLG byte of a frame descriptor.
    pub struct Flags: u8 {
        const IndependentBlocks = 0b00100000;
        const BlockChecksums    = 0b00010000;
        const ContentSize       = 0b00001000;
        const ContentChecksum   = 0b00000100;
        const DictionaryId      = 0b00000001;
    }
}

impl Flags {
    #[throws(Corruption)]
    pub fn parse(i: u8) -> Self {
        let version = i >> 6;
        if version != 1 {
            throw!(Corruption::BadVersion(version));
        }
        if (i & 0b10) != 0 {
            throw!(Corruption::ReservedFlagBits);
        }

        Flags::from_bits_truncate(i)
    }

    pub fn independent_blocks(&self) -> bool { self.contains(Flags::IndependentBlocks) }
    pub fn block_checksums(&self)    -> bool { self.contains(Flags::BlockChecksums) }
    pub fn content_size(&self)       -> bool { self.contains(Flags::ContentSize) }
    pub fn content_checksum(&self)   -> bool { self.contains(Flags::ContentChecksum) }
    pub fn dictionary_id(&self)      -> bool { self.contains(Flags::DictionaryId) }
}

/// The BD byte of a frame descriptor.
///
/// Only the block-maximum-size field is defined. It is a promise by the
/// encoder, not an instruction to the decoder: we size the output
/// dynamically, so the field is validated for reserved bits and otherwise
/// left alone.
#[derive(Debug, Clone, Copy)]
pub struct BlockDescriptor(pub u8);

impl BlockDescriptor {
    #[throws(Corruption)]
    pub fn parse(i: u8) -> Self {
        if (i & 0b1000_1111) != 0 {
            throw!(Corruption::ReservedBdBits);
        }
        BlockDescriptor(i)
    }

    /// The advertised block maximum size, when the field holds one of the
    /// four values the format defines.
    pub fn block_maxsize(&self) -> Option<usize> {
        let size = (self.0 >> 4) & 0b111;
        if (4..8).contains(&size) {
            Some(1 << (size * 2 + 8))
        } else {
            None
        }
    }
}
