use super::{
    chunks::{pad_len, ChunkError, ChunkLocation, FormatChunk, OtherChunk},
    endian,
    error::{Error, Result},
    ids::{self, ChunkID},
};
use log::{debug, info};
use seek_bufread::BufReader;
use std::io::{self, Read, Seek, SeekFrom};

pub const MAX_OTHER_CHUNKS: usize = 256;

/// Where everything worth keeping lives in the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveLayout {
    pub format: FormatChunk,
    /// bytes after the 16 byte descriptor, `size` 0 when there are none
    pub format_extra: ChunkLocation,
    /// the whole `data` chunk, id and length included
    pub data: ChunkLocation,
    /// unrecognised chunks in file order
    pub others: Vec<OtherChunk>,
}

/// Walks the top level chunks of a RIFF/WAVE file. Existing `cue ` and
/// `LIST/adtl` chunks are skipped so they can be replaced.
pub struct WaveReader<Source> {
    buf: BufReader<Source>,
    max_other_chunks: usize,
}

impl<S: Read + Seek> WaveReader<S> {
    pub fn new(source: S) -> WaveReader<S> {
        WaveReader {
            buf: BufReader::new(source),
            max_other_chunks: MAX_OTHER_CHUNKS,
        }
    }

    pub fn with_max_other_chunks(mut self, max: usize) -> WaveReader<S> {
        self.max_other_chunks = max;
        self
    }

    /// The underlying stream; chunk locations are offsets into it.
    pub fn source(&mut self) -> &mut BufReader<S> {
        &mut self.buf
    }

    pub fn scan(&mut self) -> Result<WaveLayout> {
        info!("Reading input wave file.");

        let len = self.buf.seek(SeekFrom::End(0))?;
        self.buf.seek(SeekFrom::Start(0))?;
        self.read_header()?;

        let mut format = None;
        let mut format_extra = ChunkLocation::default();
        let mut data = None;
        let mut others = vec![];
        let mut num_chunks = 0;

        while let Some(id) = read_chunk_id(&mut self.buf)? {
            // buffer position is right past the id
            let offset = self.buf.stream_position()? - 4;
            let size = read_u32_le(&mut self.buf).map_err(truncated(id))?;
            let payload_end = offset + 8 + u64::from(size);
            if payload_end > len {
                return Err(ChunkError::Truncated(id).into());
            }
            num_chunks += 1;

            match &id {
                ids::FORMAT => {
                    if format.is_some() {
                        return Err(ChunkError::Duplicate(id).into());
                    }
                    if size < FormatChunk::DESCRIPTOR_SIZE {
                        return Err(ChunkError::FormatTooShort(size).into());
                    }

                    let mut descriptor = [0; 16];
                    self.buf.read_exact(&mut descriptor)?;
                    let fmt = FormatChunk::parse(size, descriptor)?;
                    if fmt.extra_size() > 0 {
                        format_extra = ChunkLocation::new(
                            offset + 8 + u64::from(FormatChunk::DESCRIPTOR_SIZE),
                            u64::from(fmt.extra_size()),
                        );
                    }
                    info!("Got Format Chunk");
                    debug!(
                        "compression {} channels {} sample rate {} extra bytes {}",
                        fmt.compression_code,
                        fmt.num_channels,
                        fmt.sample_rate,
                        fmt.extra_size()
                    );
                    format = Some(fmt);
                }
                ids::DATA => {
                    if data.is_some() {
                        return Err(ChunkError::Duplicate(id).into());
                    }
                    let location = ChunkLocation::new(offset, 8 + u64::from(size));
                    info!("Got Data Chunk");
                    debug!("data at {} size {}", location.offset, location.size);
                    data = Some(location);
                }
                ids::CUE => info!("Found Existing Cue Chunk"),
                ids::LIST if size >= 4 && self.read_list_type()? == *ids::ADTL => {
                    info!("Found Existing Label Chunk")
                }
                _ => {
                    if others.len() >= self.max_other_chunks {
                        return Err(ChunkError::TooManyChunks(
                            self.max_other_chunks,
                        )
                        .into());
                    }
                    info!(
                        "Found chunk type '{}', size: {} bytes",
                        String::from_utf8_lossy(&id),
                        size
                    );
                    others.push(OtherChunk {
                        id,
                        location: ChunkLocation::new(offset, 8 + u64::from(size)),
                    });
                }
            };

            // a missing pad byte at the very end just runs into EOF
            self.buf.seek(SeekFrom::Start(
                payload_end + pad_len(u64::from(size)),
            ))?;
        }

        if num_chunks == 0 {
            return Err(ChunkError::Empty.into());
        }

        Ok(WaveLayout {
            format: format.ok_or(ChunkError::MissingFormat)?,
            format_extra,
            data: data.ok_or(ChunkError::MissingData)?,
            others,
        })
    }

    fn read_header(&mut self) -> Result<()> {
        let id = read_chunk_id(&mut self.buf)?.ok_or(ChunkError::NotRiff)?;
        if &id != ids::RIFF {
            return Err(ChunkError::NotRiff.into());
        }

        let size = read_u32_le(&mut self.buf).map_err(truncated(id))?;
        let mut form_type = [0; 4];
        self.buf.read_exact(&mut form_type).map_err(truncated(id))?;
        if &form_type != ids::WAVE {
            return Err(ChunkError::InvalidFormType(form_type).into());
        }

        // the size covers the form type, anything less leaves no chunks
        if size <= 4 {
            return Err(ChunkError::Empty.into());
        }
        debug!("riff chunk bytes {}", size);

        Ok(())
    }

    fn read_list_type(&mut self) -> Result<ChunkID> {
        let mut list_type = [0; 4];
        self.buf.read_exact(&mut list_type)?;
        Ok(list_type)
    }
}

fn truncated(id: ChunkID) -> impl FnOnce(io::Error) -> Error {
    move |e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ChunkError::Truncated(id).into(),
        _ => e.into(),
    }
}

/// Next chunk id, or `None` at end of input. A partial id is treated as the
/// end too.
pub fn read_chunk_id(r: &mut impl Read) -> io::Result<Option<ChunkID>> {
    let mut id = [0; 4];
    let mut filled = 0;
    while filled < id.len() {
        match r.read(&mut id[filled..]) {
            Ok(0) => {
                if filled > 0 {
                    debug!("ignoring {} trailing byte(s)", filled);
                }
                return Ok(None);
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(Some(id))
}

pub fn read_u32_le(r: &mut impl Read) -> io::Result<u32> {
    let mut b = [0; 4];
    r.read_exact(&mut b)?;
    Ok(endian::read_u32_le(b))
}
