use super::{pad_len, Chunk};
use crate::error::{Error, Result};
use crate::ids::{self, ChunkID};
use crate::labels::Label;
use bytes::{BufMut, BytesMut};

/// One entry of the `cue ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuePoint {
    pub id: u32,
    pub position: u32, // play order position
    pub data_chunk_id: ChunkID,
    pub chunk_start: u32,
    pub block_start: u32,
    pub sample_offset: u32, // AKA frame offset
}

impl CuePoint {
    pub const SIZE: usize = 24;

    /// Cue point into the `data` chunk at frame `sample_index`. With no
    /// playlist the play order position is the sample offset.
    pub fn new(id: u32, sample_index: u32) -> CuePoint {
        CuePoint {
            id,
            position: sample_index,
            data_chunk_id: *ids::DATA,
            chunk_start: 0,
            block_start: 0,
            sample_offset: sample_index,
        }
    }
}

impl Chunk for CuePoint {
    fn encoded_len(&self) -> usize {
        Self::SIZE
    }

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32_le(self.id);
        buf.put_u32_le(self.position);
        buf.put_slice(&self.data_chunk_id);
        buf.put_u32_le(self.chunk_start);
        buf.put_u32_le(self.block_start);
        buf.put_u32_le(self.sample_offset);
    }
}

/// A `labl` sub-chunk of the `LIST/adtl` chunk, bound to a cue point by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelText {
    pub cue_id: u32,
    pub text: Vec<u8>, // no terminator, that's added on write
}

impl LabelText {
    /// The `labl` length field: cue id + text + terminator.
    pub fn data_size(&self) -> u64 {
        4 + self.text.len() as u64 + 1
    }
}

impl Chunk for LabelText {
    fn encoded_len(&self) -> usize {
        let size = self.data_size();
        (8 + size + pad_len(size)) as usize
    }

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        let size = self.data_size();
        buf.put_slice(ids::LABEL);
        buf.put_u32_le(size as u32);
        buf.put_u32_le(self.cue_id);
        buf.put_slice(&self.text);
        buf.put_u8(0);
        if pad_len(size) > 0 {
            buf.put_u8(0);
        }
    }
}

/// The new `cue ` and `LIST/adtl` contents, built together so the n-th cue
/// point and the n-th label share cue id n + 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotations {
    cue_points: Vec<CuePoint>,
    labels: Vec<LabelText>,
}

impl Annotations {
    pub fn from_labels(labels: &[Label]) -> Result<Annotations> {
        let count =
            u32::try_from(labels.len()).map_err(|_| Error::SizeOverflow)?;

        let (cue_points, texts): (Vec<_>, Vec<_>) = (1..=count)
            .zip(labels)
            .map(|(id, label)| {
                (
                    CuePoint::new(id, label.sample_index),
                    LabelText {
                        cue_id: id,
                        text: label.text.clone(),
                    },
                )
            })
            .unzip();

        let annotations = Annotations {
            cue_points,
            labels: texts,
        };

        // both length fields are 32 bit
        u32::try_from(annotations.cue_body_size())
            .and(u32::try_from(4 + annotations.list_body_size()))
            .map_err(|_| Error::SizeOverflow)?;

        Ok(annotations)
    }

    pub fn cue_points(&self) -> &[CuePoint] {
        &self.cue_points
    }

    pub fn labels(&self) -> &[LabelText] {
        &self.labels
    }

    pub fn cue_count(&self) -> u32 {
        self.cue_points.len() as u32
    }

    /// cue count + 24 bytes per cue point
    pub fn cue_body_size(&self) -> u64 {
        4 + (CuePoint::SIZE * self.cue_points.len()) as u64
    }

    /// Every `labl` record including its pad byte, without the `adtl` type.
    pub fn list_body_size(&self) -> u64 {
        self.labels.iter().map(|l| l.encoded_len() as u64).sum()
    }

    pub fn cue_body(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.cue_body_size() as usize);
        buf.put_u32_le(self.cue_count());
        for cue in &self.cue_points {
            cue.write_to(&mut buf);
        }
        buf
    }

    pub fn list_body(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.list_body_size() as usize);
        for label in &self.labels {
            label.write_to(&mut buf);
        }
        buf
    }
}
