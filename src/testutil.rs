// in-memory RIFF builders for unit tests

/// 44.1kHz 16 bit mono PCM descriptor
pub const PCM_MONO: [u8; 16] = [
    0x01, 0x00, 0x01, 0x00, 0x44, 0xAC, 0x00, 0x00, 0x88, 0x58, 0x01, 0x00,
    0x02, 0x00, 0x10, 0x00,
];

/// id + length + payload + pad
pub fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut c = id.to_vec();
    c.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    c.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        c.push(0);
    }
    c
}

pub fn wave(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = chunks.concat();
    let mut w = b"RIFF".to_vec();
    w.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
    w.extend_from_slice(b"WAVE");
    w.extend_from_slice(&body);
    w
}
