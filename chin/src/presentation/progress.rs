//! Terminal progress for long-running commands.

use chin_core::{ExtractStats, Observer};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::presentation::format::format_file_size;

/// Drives one entry-count progress bar from core callbacks.
pub struct CliProgress {
    bar: ProgressBar,
    verb: &'static str,
    warnings: u64,
}

impl CliProgress {
    pub fn new(verb: &'static str, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries {wide_msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        };
        Self {
            bar,
            verb,
            warnings: 0,
        }
    }

    /// Warnings seen so far; their text has already been logged.
    pub fn warnings(&self) -> u64 {
        self.warnings
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Observer for CliProgress {
    fn on_total(&mut self, entries: u64) {
        self.bar.set_length(entries);
    }

    fn on_entry_processed(&mut self, path: &str) {
        self.bar.set_message(format!("{} {}", self.verb, shorten(path, 40)));
        self.bar.inc(1);
    }

    fn on_part_written(&mut self, path: &Path, size: u64) {
        if !self.bar.is_hidden() {
            self.bar.println(format!(
                "  wrote {} ({})",
                path.display(),
                format_file_size(size)
            ));
        }
    }

    fn on_warning(&mut self, _message: &str) {
        self.warnings += 1;
    }

    fn on_summary(&mut self, stats: &ExtractStats) {
        self.bar.set_position(stats.entries);
    }
}

fn shorten(name: &str, max: usize) -> String {
    let count = name.chars().count();
    if count <= max {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (max - 3)).collect();
    format!("...{tail}")
}
