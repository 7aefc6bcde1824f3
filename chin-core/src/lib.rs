#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod naming;
pub mod progress;
pub mod stats;

pub mod util {
    pub mod hash_forward;
    pub mod sanitize;
}

pub mod codec;

pub mod pack {
    pub mod split;
    pub mod walker;
    pub mod writer;
}

pub mod read {
    pub mod extract;
    pub mod parts;
    pub mod plan;
}

pub mod list;

// Re-exports: stable API surface
pub use codec::{ArchiveSink, Entry, EntryKind, EntryReader, encode_entry};
pub use error::{ChinError, Result};
pub use list::list;
pub use pack::split::{split, split_bytes};
pub use pack::writer::{CompressOptions, CompressReport, compress};
pub use progress::{NoopObserver, Observer};
pub use read::extract::{VerifyReport, decompress, extract, verify};
pub use read::parts::{locate_and_join, locate_parts};
pub use read::plan::{Plan, validate};
pub use stats::ExtractStats;
