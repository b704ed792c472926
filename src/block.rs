//! The LZ4 block format: a stream of tokenized literal/match sequences.
//!
//! A block on its own has no header, no length fields and no checksums;
//! all of that lives in the frame layer. What it does have is a lookback
//! mechanism where matches reference bytes earlier in the output, possibly
//! bytes produced by a preceding block.

use fehler::{throw, throws};

use crate::error::{Corruption, DecompressError, Unsupported};
use crate::reader::SliceReader;

/// Matches are never shorter than this; the token stores `length - 4`.
const MINMATCH: usize = 4;

/// This is how LZ4 encodes varints.
/// Just keep reading and adding while it's all F.
#[throws(DecompressError)]
fn read_length(base: u8, reader: &mut SliceReader) -> usize {
    let mut value = base as usize;
    if base == 0xF {
        loop {
            let more = reader.read_u8()?;
            value = value
                .checked_add(more as usize)
                .ok_or(Unsupported::LengthOverflow)?;
            if more != 0xFF {
                break;
            }
        }
    }
    value
}

/// Decompress a single LZ4 block, appending to `output`.
///
/// LZ4 heavily relies on a lookback mechanism where bytes earlier in the
/// output stream are referenced, so `output` may already hold history that
/// this block's matches are allowed to reach into. `window_base` is the
/// lowest index a match may reference: pass the current output length to
/// decode the block against no history at all (independent blocks), or 0
/// to make everything before it reachable (dependent blocks). Offsets are
/// 16 bits on the wire, so no match reaches further back than 64 KiB
/// either way.
///
/// The block must be exactly `input` long; trailing input that is not part
/// of a sequence is a framing mistake, not tolerated garbage.
#[throws(DecompressError)]
pub fn decompress_block(input: &[u8], output: &mut Vec<u8>, window_base: usize) {
    let mut reader = SliceReader::new(input);

    while !reader.is_empty() {
        let token = reader.read_u8()?;

        let literal_length = read_length(token >> 4, &mut reader)?;
        output.extend_from_slice(reader.take(literal_length)?);

        // the last sequence of a block is literals only
        if reader.is_empty() {
            break;
        }

        let offset = reader.read_u16()? as usize;
        let match_length = read_length(token & 0xF, &mut reader)?
            .checked_add(MINMATCH)
            .ok_or(Unsupported::LengthOverflow)?;
        copy_match(output, offset, match_length, window_base)?;
    }
}

/// Append `match_length` bytes starting `offset` bytes before the current
/// end of `output`.
///
/// When `offset < match_length` the source overlaps the bytes being
/// produced, and the copy must proceed byte by byte so that freshly copied
/// bytes become part of the source; this is how the format encodes runs.
#[throws(DecompressError)]
fn copy_match(output: &mut Vec<u8>, offset: usize, match_length: usize, window_base: usize) {
    let old_len = output.len();
    let available = old_len.saturating_sub(window_base);
    if offset == 0 || offset > available {
        throw!(DecompressError::Corrupted(Corruption::BadMatchOffset {
            offset,
            available,
        }));
    }

    match offset {
        // a run of the byte before the match: memset
        1 => {
            let byte = output[old_len - 1];
            output.resize(old_len + match_length, byte);
        }
        // source and destination are disjoint: memcpy
        // (for borrowck reasons we extend with zeroes first and then copy,
        // instead of simply using extend_from_slice)
        o if match_length <= o => {
            output.resize(old_len + match_length, 0);
            let (head, tail) = output.split_at_mut(old_len);
            tail.copy_from_slice(&head[old_len - o..][..match_length]);
        }
        // overlapping: single bytes
        _ => {
            output.reserve(match_length);
            for i in 0..match_length {
                let byte = output[old_len - offset + i];
                output.push(byte);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &[u8]) -> Result<Vec<u8>, DecompressError> {
        let mut output = Vec::new();
        decompress_block(input, &mut output, 0)?;
        Ok(output)
    }

    #[test]
    fn aaaaaaaaaaa_lots_of_aaaaaaaaa() {
        assert_eq!(decode(&[0x11, b'a', 1, 0]).unwrap(), b"aaaaaa");
    }

    #[test]
    fn multiple_repeated_sequences() {
        assert_eq!(
            decode(&[0x11, b'a', 1, 0, 0x22, b'b', b'c', 2, 0]).unwrap(),
            b"aaaaaabcbcbcbc"
        );
    }

    #[test]
    fn all_literal() {
        assert_eq!(decode(&[0x30, b'a', b'4', b'9']).unwrap(), b"a49");
    }

    #[test]
    fn empty_block_decodes_to_nothing() {
        assert_eq!(decode(&[]).unwrap(), b"");
    }

    #[test]
    fn extended_literal_length() {
        let mut input = vec![0xF0, 0x05];
        input.extend_from_slice(&[7; 20]);
        assert_eq!(decode(&input).unwrap(), [7; 20]);

        // a 0xFF continuation byte keeps the extension going
        let mut input = vec![0xF0, 0xFF, 0x01];
        input.extend_from_slice(&[9; 271]);
        assert_eq!(decode(&input).unwrap().len(), 271);
    }

    #[test]
    fn extended_match_length_makes_a_run() {
        // one 'X', then a match at offset 1 of length 4 + 15 + 45
        let output = decode(&[0x1F, b'X', 1, 0, 45]).unwrap();
        assert_eq!(output, vec![b'X'; 65]);
    }

    #[test]
    fn overlapping_match_cycles_through_the_source() {
        let mut output = b"XYZ".to_vec();
        decompress_block(&[0x00, 3, 0], &mut output, 0).unwrap();
        assert_eq!(output, b"XYZXYZX");
    }

    #[test]
    fn match_offset_must_not_be_zero() {
        let err = decode(&[0x10, b'a', 0, 0]).unwrap_err();
        assert_eq!(
            err,
            Corruption::BadMatchOffset { offset: 0, available: 1 }.into()
        );
    }

    #[test]
    fn match_offset_must_not_reach_before_the_window() {
        let err = decode(&[0x10, b'a', 2, 0]).unwrap_err();
        assert_eq!(
            err,
            Corruption::BadMatchOffset { offset: 2, available: 1 }.into()
        );
    }

    #[test]
    fn window_base_fences_off_earlier_output() {
        // with the fence at the end of the existing history, the match
        // has nothing to reference
        let mut output = b"history".to_vec();
        let err = decompress_block(&[0x00, 1, 0], &mut output, 7).unwrap_err();
        assert_eq!(
            err,
            Corruption::BadMatchOffset { offset: 1, available: 0 }.into()
        );

        // the same block with the fence at 0 may reach the history
        let mut output = b"history".to_vec();
        decompress_block(&[0x00, 1, 0], &mut output, 0).unwrap();
        assert_eq!(output, b"historyyyyy");
    }

    #[test]
    fn truncated_literals() {
        assert_eq!(decode(&[0x30, b'a']).unwrap_err(), DecompressError::Truncated);
    }

    #[test]
    fn truncated_match_offset() {
        assert_eq!(decode(&[0x10, b'a', 1]).unwrap_err(), DecompressError::Truncated);
    }

    #[test]
    fn truncated_length_extension() {
        assert_eq!(
            decode(&[0x1F, b'a', 1, 0, 0xFF]).unwrap_err(),
            DecompressError::Truncated
        );
    }
}
