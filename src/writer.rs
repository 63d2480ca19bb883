use super::{
    chunks::{pad_len, Annotations, Chunk, ChunkLocation},
    endian,
    error::{Error, Result},
    ids,
    reader::WaveLayout,
};
use bytes::{BufMut, BytesMut};
use log::{debug, info};
use std::io::{self, Read, Seek, SeekFrom, Write};

pub const DEFAULT_COPY_BUFFER_SIZE: usize = 64 * 1024;
pub const MIN_COPY_BUFFER_SIZE: usize = 1024;

/// Value of the RIFF length field for the rewritten file: everything after
/// the length field itself, pad bytes included.
pub fn riff_size(layout: &WaveLayout, annotations: &Annotations) -> u64 {
    let others: u64 = layout
        .others
        .iter()
        .map(|c| c.location.padded_size())
        .sum();
    let list = annotations.list_body_size();

    4 // WAVE
        + layout.format.encoded_len() as u64
        + layout.format_extra.padded_size()
        + layout.data.padded_size()
        + 8 + annotations.cue_body_size()
        + 12 + list + pad_len(list)
        + others
}

/// Writes the new file: header, `fmt `, `data`, `cue `, `LIST/adtl`, then
/// every other chunk in the order it was found.
pub struct WaveWriter<W> {
    out: W,
    copy_buf: Vec<u8>,
}

impl<W: Write> WaveWriter<W> {
    pub fn new(out: W) -> WaveWriter<W> {
        Self::with_copy_buffer_size(out, DEFAULT_COPY_BUFFER_SIZE)
    }

    pub fn with_copy_buffer_size(out: W, size: usize) -> WaveWriter<W> {
        WaveWriter {
            out,
            copy_buf: vec![0; size.max(MIN_COPY_BUFFER_SIZE)],
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Returns the RIFF length that was written.
    pub fn write<R: Read + Seek>(
        &mut self,
        input: &mut R,
        layout: &WaveLayout,
        annotations: &Annotations,
    ) -> Result<u32> {
        info!("Writing output file.");

        let size = riff_size(layout, annotations);
        let size = u32::try_from(size).map_err(|_| Error::SizeOverflow)?;
        debug!("riff chunk bytes {}", size);

        let mut head = BytesMut::with_capacity(12 + 24);
        head.put_slice(ids::RIFF);
        head.put_slice(&endian::write_u32_le(size));
        head.put_slice(ids::WAVE);
        layout.format.write_to(&mut head);
        self.out.write_all(&head)?;

        if layout.format_extra.size > 0 {
            self.copy_chunk(input, layout.format_extra)?;
        }
        self.copy_chunk(input, layout.data)?;

        let cue = annotations.cue_body();
        let mut head = BytesMut::with_capacity(8);
        head.put_slice(ids::CUE);
        head.put_u32_le(cue.len() as u32);
        self.out.write_all(&head)?;
        self.out.write_all(&cue)?;
        debug!("cue chunk: {} cue points", annotations.cue_count());

        let list = annotations.list_body();
        let mut head = BytesMut::with_capacity(12);
        head.put_slice(ids::LIST);
        head.put_u32_le(4 + list.len() as u32);
        head.put_slice(ids::ADTL);
        self.out.write_all(&head)?;
        self.out.write_all(&list)?;
        self.pad(list.len() as u64)?;
        debug!("adtl chunk: {} bytes of labels", list.len());

        for other in &layout.others {
            self.copy_chunk(input, other.location)?;
        }

        self.out.flush()?;
        Ok(size)
    }

    fn copy_chunk<R: Read + Seek>(
        &mut self,
        input: &mut R,
        location: ChunkLocation,
    ) -> io::Result<()> {
        copy_range(input, &mut self.out, location, &mut self.copy_buf)?;
        self.pad(location.size)
    }

    fn pad(&mut self, size: u64) -> io::Result<()> {
        if pad_len(size) > 0 {
            self.out.write_all(&[0])?;
        }
        Ok(())
    }
}

/// Copies `location` from `input` to `output` through `buf`, leaving the
/// input positioned where it was.
pub fn copy_range<R: Read + Seek, W: Write>(
    input: &mut R,
    output: &mut W,
    location: ChunkLocation,
    buf: &mut [u8],
) -> io::Result<()> {
    if buf.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "copy buffer is empty",
        ));
    }

    let saved = input.stream_position()?;
    input.seek(SeekFrom::Start(location.offset))?;

    let mut remaining = location.size;
    while remaining > 0 {
        let n = remaining.min(buf.len() as u64) as usize;
        input.read_exact(&mut buf[..n])?;
        output.write_all(&buf[..n])?;
        remaining -= n as u64;
    }

    input.seek(SeekFrom::Start(saved))?;
    Ok(())
}
