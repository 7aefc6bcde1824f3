use crate::codec::EntryKind;
use crate::error::{ChinError, Result};
use crate::naming;
use crate::progress::{self, Observer};
use crate::read::parts;
use crate::read::plan::{Plan, validate};
use crate::stats::ExtractStats;
use crate::util::sanitize::safe_join;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Materialise every record of a validated archive under `dest`.
///
/// Directories are created with all missing ancestors; files overwrite
/// whatever is at their path. Any short read here is an error even though
/// validation tolerated a dangling length field: extraction is not
/// transactional, so entries already written stay on disk.
pub fn extract(plan: Plan<'_>, dest: &Path, observer: &mut dyn Observer) -> Result<ExtractStats> {
    let mut stats = ExtractStats {
        expected: plan.entries(),
        ..ExtractStats::default()
    };

    for entry in plan.records() {
        let entry = entry?;
        let out = safe_join(dest, entry.path)?;
        let shown = entry.path_lossy();
        match entry.kind() {
            EntryKind::Directory => {
                fs::create_dir_all(&out).map_err(|e| ChinError::fs(&out, e))?;
                stats.dirs += 1;
            }
            EntryKind::File => {
                if let Some(parent) = out.parent() {
                    fs::create_dir_all(parent).map_err(|e| ChinError::fs(parent, e))?;
                }
                fs::write(&out, entry.content).map_err(|e| ChinError::fs(&out, e))?;
                stats.files += 1;
            }
        }
        tracing::debug!(path = %shown, kind = ?entry.kind(), size = entry.size(), "extracted");
        stats.entries += 1;
        observer.on_entry_processed(&shown);
    }

    if !stats.matches_plan() {
        progress::warn(
            observer,
            format!(
                "Expected {} entries but processed {} entries",
                stats.expected, stats.entries
            ),
        );
    }
    tracing::info!(
        files = stats.files,
        dirs = stats.dirs,
        entries = stats.entries,
        "extraction finished"
    );
    observer.on_summary(&stats);
    Ok(stats)
}

/// Read a whole archive into memory, joining parts when `src` is named like
/// one (`<base>-<N>.chin`).
pub fn load_archive(src: &Path, observer: &mut dyn Observer) -> Result<Vec<u8>> {
    if naming::is_part_path(src) {
        tracing::info!(path = %src.display(), "detected split archive");
        parts::locate_and_join(src, observer)
    } else {
        tracing::info!(path = %src.display(), "reading archive");
        fs::read(src).map_err(|e| ChinError::fs(src, e))
    }
}

/// Load, validate, then extract into `dest`.
pub fn decompress(src: &Path, dest: &Path, observer: &mut dyn Observer) -> Result<ExtractStats> {
    let data = load_archive(src, observer)?;
    let plan = validate(&data)?;
    observer.on_total(plan.entries());
    extract(plan, dest, observer)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub entries: u64,
    pub bytes: u64,
    /// BLAKE3 of the logical archive, hex.
    pub digest: String,
}

/// Run only the validate pass; nothing is written.
pub fn verify(src: &Path, observer: &mut dyn Observer) -> Result<VerifyReport> {
    let data = load_archive(src, observer)?;
    let plan = validate(&data)?;
    Ok(VerifyReport {
        entries: plan.entries(),
        bytes: plan.byte_len(),
        digest: plan.digest().to_hex().to_string(),
    })
}
