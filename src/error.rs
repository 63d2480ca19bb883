use crate::chunks::ChunkError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that aborts a conversion.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error("did not find any cue point locations in the label file")]
    NoLabels,

    #[error("output would exceed the 4 GiB limit of a RIFF file")]
    SizeOverflow,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
