#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn fmt_payload(code: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let mut p = vec![];
    p.extend_from_slice(&code.to_le_bytes());
    p.extend_from_slice(&channels.to_le_bytes());
    p.extend_from_slice(&rate.to_le_bytes());
    p.extend_from_slice(&(rate * u32::from(block_align)).to_le_bytes());
    p.extend_from_slice(&block_align.to_le_bytes());
    p.extend_from_slice(&bits.to_le_bytes());
    p
}

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
    let body = chunks.concat();
    let mut w = b"RIFF".to_vec();
    w.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
    w.extend_from_slice(b"WAVE");
    w.extend_from_slice(&body);
    w
}

/// 16 bit mono samples counting up from 0
pub fn ramp(frames: usize) -> Vec<u8> {
    (0..frames)
        .flat_map(|i| (i as i16).to_le_bytes().to_vec())
        .collect()
}

/// One second of 44.1kHz 16 bit mono silence.
pub fn silent_second() -> Vec<u8> {
    wave(&[
        chunk(b"fmt ", &fmt_payload(1, 1, 44100, 16)),
        chunk(b"data", &vec![0; 88200]),
    ])
}

/// Top level chunks of a RIFF file as (id, offset, payload), checking the
/// layout adds up along the way.
pub fn chunks(file: &[u8]) -> Vec<([u8; 4], usize, Vec<u8>)> {
    assert_eq!(&file[0..4], b"RIFF");
    assert_eq!(&file[8..12], b"WAVE");

    let mut out = vec![];
    let mut pos = 12;
    while pos < file.len() {
        let mut id = [0; 4];
        id.copy_from_slice(&file[pos..pos + 4]);
        let len = u32_at(file, pos + 4) as usize;
        out.push((id, pos, file[pos + 8..pos + 8 + len].to_vec()));
        pos += 8 + len + len % 2;
    }
    assert_eq!(pos, file.len());
    out
}

pub fn payload(file: &[u8], id: &[u8; 4]) -> Vec<u8> {
    let found: Vec<_> = chunks(file)
        .into_iter()
        .filter(|c| &c.0 == id)
        .collect();
    assert_eq!(found.len(), 1, "expected exactly one {:?} chunk", id);
    found[0].2.clone()
}

pub fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    let mut b = [0; 4];
    b.copy_from_slice(&bytes[pos..pos + 4]);
    u32::from_le_bytes(b)
}

#[derive(Debug, PartialEq, Eq)]
pub struct Cue {
    pub id: u32,
    pub position: u32,
    pub data_chunk_id: [u8; 4],
    pub chunk_start: u32,
    pub block_start: u32,
    pub sample_offset: u32,
}

pub fn cues(cue_payload: &[u8]) -> Vec<Cue> {
    let count = u32_at(cue_payload, 0) as usize;
    assert_eq!(cue_payload.len(), 4 + 24 * count);
    (0..count)
        .map(|i| {
            let at = 4 + 24 * i;
            let mut data_chunk_id = [0; 4];
            data_chunk_id.copy_from_slice(&cue_payload[at + 8..at + 12]);
            Cue {
                id: u32_at(cue_payload, at),
                position: u32_at(cue_payload, at + 4),
                data_chunk_id,
                chunk_start: u32_at(cue_payload, at + 12),
                block_start: u32_at(cue_payload, at + 16),
                sample_offset: u32_at(cue_payload, at + 20),
            }
        })
        .collect()
}

/// (cue id, text including terminator) of every `labl` in a `LIST/adtl`
pub fn labels(list_payload: &[u8]) -> Vec<(u32, Vec<u8>)> {
    assert_eq!(&list_payload[0..4], b"adtl");
    let mut out = vec![];
    let mut pos = 4;
    while pos < list_payload.len() {
        assert_eq!(&list_payload[pos..pos + 4], b"labl");
        let size = u32_at(list_payload, pos + 4) as usize;
        let cue_id = u32_at(list_payload, pos + 8);
        out.push((cue_id, list_payload[pos + 12..pos + 8 + size].to_vec()));
        pos += 8 + size + size % 2;
    }
    assert_eq!(pos, list_payload.len());
    out
}

/// Scratch directory holding the input, label and output files.
pub struct Scratch {
    pub dir: TempDir,
}

impl Scratch {
    pub fn new() -> Scratch {
        Scratch {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write scratch file");
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn read(path: &Path) -> Vec<u8> {
    fs::read(path).expect("Failed to read output")
}
