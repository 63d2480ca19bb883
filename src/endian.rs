//! Little endian conversions for the RIFF length field and chunk headers
//! read off the stream. The `u16` fields only occur inside chunk bodies and
//! go through `bytes` (`Buf::get_u16_le` / `BufMut::put_u16_le`).
//!
//! WAVE is little endian no matter what the host is, so none of these look
//! at the host byte order.

pub fn read_u32_le(b: [u8; 4]) -> u32 {
    u32::from_le_bytes(b)
}

pub fn write_u32_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}
