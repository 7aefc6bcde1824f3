//! Archive splitter: positional slicing of a finished archive into
//! `<base>-<N>.chin` part files.

use crate::error::{ChinError, Result};
use crate::naming;
use crate::progress::Observer;
use std::fs;
use std::num::{NonZeroU32, NonZeroU64};
use std::path::{Path, PathBuf};

pub const MIB: NonZeroU64 = NonZeroU64::new(1024 * 1024).unwrap();

pub fn part_size(max_part_mb: NonZeroU32) -> NonZeroU64 {
    NonZeroU64::from(max_part_mb).saturating_mul(MIB)
}

/// Number of parts `len` bytes produce; an empty archive still gets one.
pub fn part_count(len: u64, part_size: NonZeroU64) -> u64 {
    len.div_ceil(part_size.get()).max(1)
}

/// Split `buffer` into parts of at most `max_part_mb` MiB each, named after
/// `archive` with its `.chin` suffix replaced by `-<N>.chin`.
pub fn split(
    buffer: &[u8],
    archive: &Path,
    max_part_mb: NonZeroU32,
    observer: &mut dyn Observer,
) -> Result<Vec<PathBuf>> {
    split_bytes(buffer, archive, part_size(max_part_mb), observer)
}

/// Same as [`split`] with the part size given in bytes.
///
/// Slicing ignores record boundaries; a record may straddle two parts.
pub fn split_bytes(
    buffer: &[u8],
    archive: &Path,
    part_size: NonZeroU64,
    observer: &mut dyn Observer,
) -> Result<Vec<PathBuf>> {
    let count = part_count(buffer.len() as u64, part_size);
    let count = u32::try_from(count)
        .map_err(|_| ChinError::Format(format!("archive would need {count} parts")))?;
    let size = usize::try_from(part_size.get()).unwrap_or(usize::MAX);
    let base = naming::part_base(archive);

    tracing::info!(
        total = buffer.len(),
        part_size = part_size.get(),
        parts = count,
        "splitting archive"
    );

    let mut written = Vec::with_capacity(count as usize);
    let mut start = 0usize;
    for index in 1..=count {
        let end = start.saturating_add(size).min(buffer.len());
        let chunk = &buffer[start..end];
        let path = naming::part_path(&base, index);
        fs::write(&path, chunk).map_err(|e| ChinError::fs(&path, e))?;
        tracing::debug!(part = index, path = %path.display(), size = chunk.len(), "part written");
        observer.on_part_written(&path, chunk.len() as u64);
        written.push(path);
        start = end;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::testing::Recorder;
    use tempfile::TempDir;

    fn nz(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[test]
    fn test_part_size_from_mb() {
        assert_eq!(part_size(NonZeroU32::new(1).unwrap()).get(), 1_048_576);
        assert_eq!(part_size(NonZeroU32::new(1000).unwrap()).get(), 1_048_576_000);
    }

    #[test]
    fn test_part_count() {
        assert_eq!(part_count(0, nz(10)), 1);
        assert_eq!(part_count(10, nz(10)), 1);
        assert_eq!(part_count(11, nz(10)), 2);
        assert_eq!(part_count(10_000, nz(4_000)), 3);
    }

    #[test]
    fn test_split_sizes_and_names() {
        let tmp = TempDir::new().unwrap();
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut rec = Recorder::default();
        let parts = split_bytes(&data, &tmp.path().join("big.chin"), nz(4_000), &mut rec).unwrap();

        assert_eq!(
            parts,
            vec![
                tmp.path().join("big-1.chin"),
                tmp.path().join("big-2.chin"),
                tmp.path().join("big-3.chin"),
            ]
        );
        let sizes: Vec<u64> = rec.parts.iter().map(|(_, s)| *s).collect();
        assert_eq!(sizes, vec![4_000, 4_000, 2_000]);

        let mut joined = Vec::new();
        for p in &parts {
            joined.extend(fs::read(p).unwrap());
        }
        assert_eq!(joined, data);
    }

    #[test]
    fn test_split_empty_buffer_writes_one_empty_part() {
        let tmp = TempDir::new().unwrap();
        let mut rec = Recorder::default();
        let parts = split_bytes(&[], &tmp.path().join("e.chin"), nz(16), &mut rec).unwrap();
        assert_eq!(parts, vec![tmp.path().join("e-1.chin")]);
        assert_eq!(fs::read(&parts[0]).unwrap().len(), 0);
    }

    #[test]
    fn test_split_exact_multiple() {
        let tmp = TempDir::new().unwrap();
        let mut rec = Recorder::default();
        let parts = split_bytes(&[7u8; 32], &tmp.path().join("x.chin"), nz(16), &mut rec).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(rec.parts[1].1, 16);
    }
}
