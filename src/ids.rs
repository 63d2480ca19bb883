pub type ChunkID = [u8; 4];

pub const RIFF: &ChunkID = b"RIFF";
pub const WAVE: &ChunkID = b"WAVE";
pub const FORMAT: &ChunkID = b"fmt ";
pub const DATA: &ChunkID = b"data";
pub const CUE: &ChunkID = b"cue ";
pub const LIST: &ChunkID = b"LIST";

// LIST form types / sub-chunks
pub const ADTL: &ChunkID = b"adtl"; // 'associated data list'
pub const LABEL: &ChunkID = b"labl";

pub const WAVE_FORMAT_PCM: u16 = 0x0001;
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
