//! Split locator/joiner.
//!
//! Given any one `<base>-<N>.chin`, finds its siblings in the same directory,
//! checks the indices form `1..=k`, and concatenates them in order.

use crate::error::{ChinError, Result};
use crate::naming;
use crate::progress::{self, Observer};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Bytes read from each part by the liveness probe.
const PROBE_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub index: u32,
    pub path: PathBuf,
    pub size: u64,
}

/// A complete, gap-free set of parts, sorted by index.
#[derive(Debug, Clone)]
pub struct PartSet {
    base: String,
    parts: Vec<Part>,
}

impl PartSet {
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn total_size(&self) -> u64 {
        self.parts.iter().map(|p| p.size).sum()
    }

    /// Open every part and read its first bytes, so an unreadable part fails
    /// before anything is concatenated.
    pub fn probe(&self) -> Result<()> {
        let mut buf = [0u8; PROBE_LEN];
        for p in &self.parts {
            let mut f = File::open(&p.path).map_err(|e| ChinError::fs(&p.path, e))?;
            let n = f.read(&mut buf).map_err(|e| ChinError::fs(&p.path, e))?;
            tracing::debug!(part = p.index, path = %p.path.display(), size = p.size, probed = n, "part readable");
        }
        Ok(())
    }

    /// Concatenate every part in index order.
    pub fn join(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(usize::try_from(self.total_size()).unwrap_or(0));
        for p in &self.parts {
            let mut f = File::open(&p.path).map_err(|e| ChinError::fs(&p.path, e))?;
            f.read_to_end(&mut out).map_err(|e| ChinError::fs(&p.path, e))?;
        }
        tracing::info!(parts = self.parts.len(), bytes = out.len(), "parts combined");
        Ok(out)
    }
}

/// Find and check every part belonging to the same set as `any_part`.
pub fn locate_parts(any_part: &Path, observer: &mut dyn Observer) -> Result<PartSet> {
    let invalid = || ChinError::InvalidSplitFormat(any_part.to_path_buf());
    let name = any_part.file_name().and_then(|n| n.to_str()).ok_or_else(invalid)?;
    let wanted = naming::parse_part_name(name).ok_or_else(invalid)?;

    let dir = match any_part.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut parts = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ChinError::fs(dir, e))? {
        let entry = entry.map_err(|e| ChinError::fs(dir, e))?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let Some(found) = naming::parse_part_name(file_name) else {
            continue;
        };
        if found.base != wanted.base {
            continue;
        }
        let path = entry.path();
        let size = fs::metadata(&path).map_err(|e| ChinError::fs(&path, e))?.len();
        parts.push(Part {
            index: found.index,
            path,
            size,
        });
    }

    let base = wanted.base.to_string();
    if parts.is_empty() {
        return Err(ChinError::NoPartsFound { base });
    }
    parts.sort_by_key(|p| p.index);

    if let Some(dup) = parts.windows(2).find(|w| w[0].index == w[1].index) {
        return Err(ChinError::DuplicatePart {
            base,
            index: dup[0].index,
        });
    }

    let max = parts.last().map_or(0, |p| p.index);
    if max as usize != parts.len() {
        let missing: Vec<u32> = (1..=max)
            .filter(|i| parts.binary_search_by_key(i, |p| p.index).is_err())
            .collect();
        return Err(ChinError::MissingParts { base, missing });
    }

    if let [first, .., last] = parts.as_slice() {
        if last.size > first.size.saturating_mul(2) {
            progress::warn(
                observer,
                format!(
                    "Last part {} ({} bytes) is more than twice the size of the first ({} bytes); parts may be missing at the end",
                    last.path.display(),
                    last.size,
                    first.size
                ),
            );
        }
    }

    tracing::info!(base = %base, parts = parts.len(), "located split archive");
    Ok(PartSet { base, parts })
}

/// Locate, probe and concatenate; the result is a complete logical archive.
pub fn locate_and_join(any_part: &Path, observer: &mut dyn Observer) -> Result<Vec<u8>> {
    let set = locate_parts(any_part, observer)?;
    set.probe()?;
    set.join()
}
