//! A decoder for the LZ4 frame format, in 100% safe Rust.
//!
//! This crate does exactly one thing: it takes a byte slice holding an
//! LZ4 frame and gives back the decompressed content, or a typed error
//! explaining why it refused to. Frames with dependent blocks, stored
//! blocks, declared content sizes and any combination of the format's
//! XXH32 integrity checks are all handled; producing frames is someone
//! else's job.
//!
//! ```
//! // the smallest possible frame: a header and an end mark
//! let frame = [0x04, 0x22, 0x4d, 0x18, 0x60, 0x40, 0x82, 0x00, 0x00, 0x00, 0x00];
//! assert_eq!(lz4_thaw::decompress_frame(&frame).unwrap(), b"");
//! ```

#![forbid(unsafe_code)]
#![allow(non_upper_case_globals)]

pub mod block;
pub mod error;
pub mod frame;
pub mod header;
pub mod reader;

pub use crate::block::decompress_block;
pub use crate::error::{Corruption, DecompressError, Unsupported};
pub use crate::frame::{decompress_frame, FrameDecoder, MAGIC, WINDOW_SIZE};
