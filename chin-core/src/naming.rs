//! File naming: output archive names and `<base>-<N>.chin` part names.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const EXTENSION: &str = "chin";
pub const SUFFIX: &str = ".chin";

const FALLBACK_STEM: &str = "archive";

/// Output file name for a compress run.
///
/// A single directory keeps its name, a single file loses its extension, and
/// a multi-source run is named after the first source with an `-all` tag.
pub fn archive_name(first: &Path, first_is_dir: bool, multiple: bool) -> String {
    let stem = if multiple || !first_is_dir {
        first.file_stem()
    } else {
        first.file_name()
    }
    .map(|s| s.to_string_lossy().into_owned())
    .filter(|s| !s.is_empty())
    .unwrap_or_else(|| FALLBACK_STEM.to_string());

    if multiple {
        format!("{stem}-all{SUFFIX}")
    } else {
        format!("{stem}{SUFFIX}")
    }
}

/// `dir/name.chin` -> `dir/name`; paths without the suffix are returned as-is.
pub fn part_base(archive: &Path) -> PathBuf {
    let name = archive.to_string_lossy();
    match name.strip_suffix(SUFFIX) {
        Some(base) => PathBuf::from(base),
        None => archive.to_path_buf(),
    }
}

/// `base` + `-<index>.chin`.
pub fn part_path(base: &Path, index: u32) -> PathBuf {
    let mut s = OsString::from(base.as_os_str());
    s.push(format!("-{index}{SUFFIX}"));
    PathBuf::from(s)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartName<'a> {
    pub base: &'a str,
    pub index: u32,
}

/// Parse a bare file name of the form `<base>-<N>.chin`, `N >= 1`.
pub fn parse_part_name(file_name: &str) -> Option<PartName<'_>> {
    let stem = file_name.strip_suffix(SUFFIX)?;
    let (base, digits) = stem.rsplit_once('-')?;
    if base.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: u32 = digits.parse().ok()?;
    if index == 0 {
        return None;
    }
    Some(PartName { base, index })
}

/// True when the file name of `path` looks like a split part.
pub fn is_part_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(parse_part_name)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name(Path::new("photos"), true, false), "photos.chin");
        assert_eq!(archive_name(Path::new("v1.2"), true, false), "v1.2.chin");
        assert_eq!(archive_name(Path::new("notes.txt"), false, false), "notes.chin");
        assert_eq!(archive_name(Path::new("a/report.pdf"), false, true), "report-all.chin");
        assert_eq!(archive_name(Path::new("docs"), true, true), "docs-all.chin");
        assert_eq!(archive_name(Path::new("/"), true, false), "archive.chin");
    }

    #[test]
    fn test_part_paths() {
        let base = part_base(Path::new("out/data.chin"));
        assert_eq!(base, PathBuf::from("out/data"));
        assert_eq!(part_path(&base, 1), PathBuf::from("out/data-1.chin"));
        assert_eq!(part_path(&base, 12), PathBuf::from("out/data-12.chin"));
    }

    #[test]
    fn test_parse_part_name() {
        assert_eq!(
            parse_part_name("my-data-3.chin"),
            Some(PartName {
                base: "my-data",
                index: 3
            })
        );
        assert_eq!(
            parse_part_name("x-01.chin"),
            Some(PartName { base: "x", index: 1 })
        );
        assert_eq!(parse_part_name("data.chin"), None);
        assert_eq!(parse_part_name("data-0.chin"), None);
        assert_eq!(parse_part_name("-1.chin"), None);
        assert_eq!(parse_part_name("data-.chin"), None);
        assert_eq!(parse_part_name("data-1a.chin"), None);
        assert_eq!(parse_part_name("data-1.zip"), None);
        assert_eq!(parse_part_name("data-99999999999.chin"), None);
    }

    #[test]
    fn test_is_part_path() {
        assert!(is_part_path(Path::new("/tmp/x/a-2.chin")));
        assert!(!is_part_path(Path::new("/tmp/x/a.chin")));
    }
}
