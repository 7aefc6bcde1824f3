use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which length field of a record failed a bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PathLength,
    ContentLength,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::PathLength => f.write_str("path length"),
            Field::ContentLength => f.write_str("content length"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ChinError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("corrupted data: {field} {declared} exceeds remaining data {available} (offset {offset})")]
    CorruptArchive {
        field: Field,
        declared: u64,
        available: u64,
        offset: u64,
    },

    #[error("no valid entries found in the archive data")]
    EmptyArchive,

    #[error("no part files found for {base}")]
    NoPartsFound { base: String },

    #[error("missing part files for {base}: {missing:?}")]
    MissingParts { base: String, missing: Vec<u32> },

    #[error("part {index} of {base} appears more than once")]
    DuplicatePart { base: String, index: u32 },

    #[error("invalid split file format: {}", .0.display())]
    InvalidSplitFormat(PathBuf),

    #[error("path too long to store ({len} bytes, max 65535): {}", path.display())]
    PathTooLong { path: PathBuf, len: usize },

    #[error("file too large to store ({len} bytes, max 4294967295): {}", path.display())]
    FileTooLarge { path: PathBuf, len: u64 },

    #[error("archive {} would overwrite one of its sources", path.display())]
    OutputIsSource { path: PathBuf },

    #[error("no sources given")]
    NoSources,

    #[error("unsafe path in archive: {0}")]
    UnsafePath(String),
}

impl ChinError {
    /// Attach the offending path to a host I/O error.
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChinError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, ChinError>;
