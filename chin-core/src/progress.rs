//! Observer interface for long-running operations.
//!
//! Every operation takes a `&mut dyn Observer` supplied by the caller; the
//! core keeps no global progress state. All methods are observational and
//! default to doing nothing.

use crate::stats::ExtractStats;
use std::path::Path;

pub trait Observer {
    /// Number of entries the operation expects to process, once known.
    fn on_total(&mut self, entries: u64) {
        let _ = entries;
    }

    /// Called exactly once per entry written or extracted.
    fn on_entry_processed(&mut self, path: &str) {
        let _ = path;
    }

    fn on_part_written(&mut self, path: &Path, size: u64) {
        let _ = (path, size);
    }

    /// Non-fatal condition; the operation carries on.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }

    fn on_summary(&mut self, stats: &ExtractStats) {
        let _ = stats;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Forward a warning to both the log and the observer.
pub(crate) fn warn(observer: &mut dyn Observer, message: String) {
    tracing::warn!("{message}");
    observer.on_warning(&message);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::path::PathBuf;

    /// Records every callback for assertions.
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub total: Option<u64>,
        pub entries: Vec<String>,
        pub parts: Vec<(PathBuf, u64)>,
        pub warnings: Vec<String>,
        pub summary: Option<ExtractStats>,
    }

    impl Observer for Recorder {
        fn on_total(&mut self, entries: u64) {
            self.total = Some(entries);
        }
        fn on_entry_processed(&mut self, path: &str) {
            self.entries.push(path.to_string());
        }
        fn on_part_written(&mut self, path: &Path, size: u64) {
            self.parts.push((path.to_path_buf(), size));
        }
        fn on_warning(&mut self, message: &str) {
            self.warnings.push(message.to_string());
        }
        fn on_summary(&mut self, stats: &ExtractStats) {
            self.summary = Some(stats.clone());
        }
    }
}
