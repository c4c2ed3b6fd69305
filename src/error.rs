// One error type for the whole crate.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Opening, reading or writing an image or config file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File does not start with the "BM" signature.
    #[error("not a bitmap file (bad magic)")]
    BadMagic,

    /// Header is a bitmap, but not the uncompressed 24-bit layout we write.
    #[error("unsupported bitmap layout: {0}")]
    UnsupportedFormat(String),

    /// Declared dimensions differ from the fixed canvas size.
    #[error("image is {width}x{height}, canvas needs 320x240")]
    DimensionMismatch { width: i64, height: i64 },

    /// File ends before the header or the pixel rows are complete.
    #[error("bitmap truncated: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    /// Two buffers handed to one operation have different layouts.
    #[error("{0}: layout mismatch")]
    LayoutMismatch(&'static str),

    /// Config file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    // Creating the window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    // Updating the window buffer failed
    #[error("window update error: {0}")]
    WindowUpdate(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
