//! Adds cue points to a RIFF/WAVE file from an Audacity label file, in the
//! `cue ` + `LIST/adtl` layout podcast apps read as chapter markers.
//!
//! Sample data, the format chunk and unrelated chunks are copied byte for
//! byte; any existing `cue ` and `LIST/adtl` chunks are replaced.

pub mod chunks;
pub mod endian;
mod error;
pub mod ids;
pub mod labels;
pub mod reader;
#[cfg(test)]
mod testutil;
pub mod writer;

pub use error::{Error, Result};

use chunks::Annotations;
use labels::LabelParser;
use log::info;
use reader::{WaveLayout, WaveReader};
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use writer::WaveWriter;

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// unrecognised chunks allowed before giving up
    pub max_other_chunks: usize,
    /// labels starting later than this are skipped
    pub max_start_seconds: f64,
    /// raised to `writer::MIN_COPY_BUFFER_SIZE` if smaller
    pub copy_buffer_size: usize,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            max_other_chunks: reader::MAX_OTHER_CHUNKS,
            max_start_seconds: labels::MAX_START_SECONDS,
            copy_buffer_size: writer::DEFAULT_COPY_BUFFER_SIZE,
        }
    }
}

/// What a conversion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub cues: u32,
    pub skipped_lines: usize,
    pub preserved_chunks: usize,
    pub riff_size: u32,
}

struct Prepared {
    layout: WaveLayout,
    annotations: Annotations,
    skipped_lines: usize,
}

/// Reads `input` and `labels` and writes the marked up copy to `output`.
///
/// The output file is only replaced once the whole new file has been
/// written, so `output` may be the same path as `input`.
pub fn add_markers(
    input: &Path,
    labels: &Path,
    output: &Path,
    options: &Options,
) -> Result<Summary> {
    let mut reader = WaveReader::new(open(input)?)
        .with_max_other_chunks(options.max_other_chunks);
    let prepared = prepare(&mut reader, open(labels)?, options)?;

    // same directory, so persist is a rename
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut out = NamedTempFile::new_in(dir).map_err(|source| Error::Open {
        path: output.to_path_buf(),
        source,
    })?;

    let summary = finish(&mut reader, prepared, &mut out, options)?;
    drop(reader);

    out.persist(output).map_err(|e| Error::Open {
        path: output.to_path_buf(),
        source: e.error,
    })?;
    Ok(summary)
}

/// Stream version of [`add_markers`].
pub fn write_markers<R, L, W>(
    input: R,
    labels: L,
    output: W,
    options: &Options,
) -> Result<Summary>
where
    R: Read + Seek,
    L: Read,
    W: Write,
{
    let mut reader =
        WaveReader::new(input).with_max_other_chunks(options.max_other_chunks);
    let prepared = prepare(&mut reader, labels, options)?;
    finish(&mut reader, prepared, output, options)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn prepare<R: Read + Seek, L: Read>(
    reader: &mut WaveReader<R>,
    labels: L,
    options: &Options,
) -> Result<Prepared> {
    let layout = reader.scan()?;

    let list = LabelParser::new(layout.format.sample_rate)
        .with_max_start_seconds(options.max_start_seconds)
        .parse(labels)?;
    if list.labels.is_empty() {
        return Err(Error::NoLabels);
    }

    info!("Preparing new cue chunk.");
    info!("Preparing new label chunk.");
    let annotations = Annotations::from_labels(&list.labels)?;

    Ok(Prepared {
        layout,
        annotations,
        skipped_lines: list.rejected.len(),
    })
}

fn finish<R: Read + Seek, W: Write>(
    reader: &mut WaveReader<R>,
    prepared: Prepared,
    output: W,
    options: &Options,
) -> Result<Summary> {
    let Prepared {
        layout,
        annotations,
        skipped_lines,
    } = prepared;

    let mut writer =
        WaveWriter::with_copy_buffer_size(output, options.copy_buffer_size);
    let riff_size = writer.write(reader.source(), &layout, &annotations)?;
    info!("Finished.");

    Ok(Summary {
        cues: annotations.cue_count(),
        skipped_lines,
        preserved_chunks: layout.others.len(),
        riff_size,
    })
}
