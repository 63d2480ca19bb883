mod cue;

pub use self::cue::{Annotations, CuePoint, LabelText};

use super::ids::{self, ChunkID};
use bytes::{Buf, BufMut};
use thiserror::Error;

/// Structural problems with the input container. All of them are fatal.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChunkError {
    #[error("input file is not a RIFF file")]
    NotRiff,
    #[error("input file is not a WAVE file (form type {0:?})")]
    InvalidFormType(ChunkID),
    #[error("input file is an empty WAVE file")]
    Empty,
    #[error("chunk '{}' is truncated", String::from_utf8_lossy(.0))]
    Truncated(ChunkID),
    #[error("format chunk is {0} bytes, expected at least 16")]
    FormatTooShort(u32),
    #[error("compressed audio formats are not supported (compression code {0})")]
    UnsupportedCompression(u16),
    #[error("input file has more than one '{}' chunk", String::from_utf8_lossy(.0))]
    Duplicate(ChunkID),
    #[error("input file did not contain any format data")]
    MissingFormat,
    #[error("input file did not contain any sample data")]
    MissingData,
    #[error(
        "input file has more chunks than the maximum supported by this program ({0})"
    )]
    TooManyChunks(usize),
}

/// Anything that serializes itself as a little endian record inside the
/// output container.
pub trait Chunk {
    /// Serialized length in bytes, including any trailing pad byte.
    fn encoded_len(&self) -> usize;

    fn write_to<B: BufMut>(&self, buf: &mut B);
}

/// 1 if a chunk of `size` bytes needs a pad byte to stay word aligned.
pub fn pad_len(size: u64) -> u64 {
    size % 2
}

/// Byte range of something in the input that gets copied over as is.
///
/// For whole chunks `size` covers the id and length field as well as the
/// payload. The pad byte is never included; the writer regenerates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkLocation {
    pub offset: u64,
    pub size: u64,
}

impl ChunkLocation {
    pub fn new(offset: u64, size: u64) -> ChunkLocation {
        ChunkLocation { offset, size }
    }

    pub fn padded_size(&self) -> u64 {
        self.size + pad_len(self.size)
    }
}

/// A chunk the scanner doesn't understand; copied to the output untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtherChunk {
    pub id: ChunkID,
    pub location: ChunkLocation,
}

/// The 16 byte descriptor at the start of the `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChunk {
    /// declared chunk data size: 16 + extra format bytes
    pub size: u32,
    pub compression_code: u16,
    pub num_channels: u16,
    pub sample_rate: u32, // frames per second
    pub avg_bytes_per_sec: u32,
    pub block_align: u16,
    pub bit_rate: u16, // significant bits per sample
}

impl FormatChunk {
    pub const DESCRIPTOR_SIZE: u32 = 16;

    pub fn parse(
        size: u32,
        descriptor: [u8; 16],
    ) -> Result<FormatChunk, ChunkError> {
        if size < Self::DESCRIPTOR_SIZE {
            return Err(ChunkError::FormatTooShort(size));
        }

        let mut buf = &descriptor[..];
        let format = FormatChunk {
            size,
            compression_code: buf.get_u16_le(),
            num_channels: buf.get_u16_le(),
            sample_rate: buf.get_u32_le(),
            avg_bytes_per_sec: buf.get_u32_le(),
            block_align: buf.get_u16_le(),
            bit_rate: buf.get_u16_le(),
        };

        match format.compression_code {
            ids::WAVE_FORMAT_PCM | ids::WAVE_FORMAT_IEEE_FLOAT => Ok(format),
            code => Err(ChunkError::UnsupportedCompression(code)),
        }
    }

    /// Opaque trailer after the descriptor, preserved on write.
    pub fn extra_size(&self) -> u32 {
        self.size - Self::DESCRIPTOR_SIZE
    }
}

impl Chunk for FormatChunk {
    // id + length + descriptor; the extra bytes are copied separately
    fn encoded_len(&self) -> usize {
        8 + Self::DESCRIPTOR_SIZE as usize
    }

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(ids::FORMAT);
        buf.put_u32_le(self.size);
        buf.put_u16_le(self.compression_code);
        buf.put_u16_le(self.num_channels);
        buf.put_u32_le(self.sample_rate);
        buf.put_u32_le(self.avg_bytes_per_sec);
        buf.put_u16_le(self.block_align);
        buf.put_u16_le(self.bit_rate);
    }
}
