//! Source traversal.
//!
//! Each source becomes a [`Root`]: where it lives on disk, plus the stored
//! path its own record gets inside the archive. Walking a root yields every
//! object under it depth-first, pre-order, siblings in file-name order.

use crate::codec::EntryKind;
use crate::error::{ChinError, Result};
use crate::naming;
use crate::progress::{self, Observer};
use crate::util::sanitize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Root {
    /// Absolute, normalised location on disk.
    pub path: PathBuf,
    /// Archive path of the root itself; descendants are stored beneath it.
    pub stored: PathBuf,
}

/// One filesystem object to archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkItem {
    pub path: PathBuf,
    /// Archive path, relative; written as raw OS bytes.
    pub stored: PathBuf,
    pub kind: EntryKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Visit {
    Entry(WalkItem),
    /// Not a regular file or directory (symlinks, sockets, ...).
    Skipped(PathBuf),
}

/// Absolute paths the writer must never archive (its own output).
#[derive(Clone, Debug, Default)]
pub struct Exclusion {
    paths: Vec<PathBuf>,
    parts_of: Option<(PathBuf, String)>,
}

impl Exclusion {
    pub fn none() -> Self {
        Self::default()
    }

    /// Exclude the archive at `archive` (made absolute against the cwd).
    pub fn archive(archive: &Path) -> Result<Self> {
        let abs = sanitize::absolute(archive).map_err(|e| ChinError::fs(archive, e))?;
        Ok(Self {
            paths: vec![abs],
            parts_of: None,
        })
    }

    /// Exclude every `<base>-<N>.chin` part of a split run writing
    /// `archive`; the unsplit `archive` path itself is left alone.
    pub fn parts(archive: &Path) -> Result<Self> {
        let abs = sanitize::absolute(archive).map_err(|e| ChinError::fs(archive, e))?;
        let base = naming::part_base(&abs);
        let parts_of = match (base.parent(), base.file_name()) {
            (Some(dir), Some(name)) => Some((dir.to_path_buf(), name.to_string_lossy().into_owned())),
            _ => None,
        };
        Ok(Self {
            paths: Vec::new(),
            parts_of,
        })
    }

    pub fn matches(&self, abs: &Path) -> bool {
        if self.paths.iter().any(|p| p == abs) {
            return true;
        }
        let Some((dir, base)) = &self.parts_of else {
            return false;
        };
        abs.parent() == Some(dir.as_path())
            && abs
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(naming::parse_part_name)
                .is_some_and(|p| p.base == base)
    }
}

/// The ordered roots of one compress run.
#[derive(Clone, Debug, Default)]
pub struct SourceSet {
    roots: Vec<Root>,
}

impl SourceSet {
    /// Single source: paths are stored relative to the source's parent, so
    /// the top-level name survives.
    pub fn single(src: &Path) -> Result<Self> {
        std::fs::metadata(src).map_err(|e| ChinError::fs(src, e))?;
        let path = sanitize::absolute(src).map_err(|e| ChinError::fs(src, e))?;
        let stored = match path.parent() {
            Some(parent) => sanitize::relative_to(&path, parent),
            None => PathBuf::new(),
        };
        Ok(Self {
            roots: vec![Root { path, stored }],
        })
    }

    /// Several sources: each keeps its full path relative to `cwd`, no
    /// common-root rebasing. Sources that cannot be stat'ed are skipped with
    /// a warning.
    pub fn multiple(sources: &[PathBuf], cwd: &Path, observer: &mut dyn Observer) -> Result<Self> {
        let cwd = sanitize::absolute(cwd).map_err(|e| ChinError::fs(cwd, e))?;
        let mut roots = Vec::with_capacity(sources.len());
        for src in sources {
            let path = sanitize::normalize(&cwd.join(src));
            if let Err(e) = std::fs::metadata(&path) {
                progress::warn(observer, format!("Cannot access source: {} ({e})", src.display()));
                continue;
            }
            let stored = sanitize::relative_to(&path, &cwd);
            roots.push(Root { path, stored });
        }
        Ok(Self { roots })
    }

    /// Dispatch on the number of sources.
    pub fn from_sources(sources: &[PathBuf], cwd: &Path, observer: &mut dyn Observer) -> Result<Self> {
        match sources {
            [one] => Self::single(&cwd.join(one)),
            many => Self::multiple(many, cwd, observer),
        }
    }

    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Lazily walk every root in order.
    pub fn walk<'a>(&'a self, exclusion: &'a Exclusion) -> impl Iterator<Item = Result<Visit>> + 'a {
        self.roots.iter().flat_map(move |root| walk_root(root, exclusion))
    }

    /// Entries a write would emit, without reading any file contents.
    pub fn count(&self, exclusion: &Exclusion) -> Result<u64> {
        let mut n = 0u64;
        for v in self.walk(exclusion) {
            if let Visit::Entry(_) = v? {
                n += 1;
            }
        }
        Ok(n)
    }
}

fn walk_root<'a>(root: &'a Root, exclusion: &'a Exclusion) -> impl Iterator<Item = Result<Visit>> + 'a {
    WalkDir::new(&root.path)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |e| {
            let e = match e {
                Ok(e) => e,
                Err(err) => return Some(Err(ChinError::from(err))),
            };
            let p = e.path();
            if exclusion.matches(p) {
                tracing::debug!(path = %p.display(), "skipping archive output");
                return None;
            }
            let rel = p.strip_prefix(&root.path).unwrap_or(Path::new(""));
            // joining an empty path would append a trailing separator
            let stored = if rel.as_os_str().is_empty() {
                root.stored.clone()
            } else {
                root.stored.join(rel)
            };
            if stored.as_os_str().is_empty() {
                return None;
            }
            let ft = e.file_type();
            let kind = if ft.is_dir() {
                EntryKind::Directory
            } else if ft.is_file() {
                EntryKind::File
            } else {
                return Some(Ok(Visit::Skipped(p.to_path_buf())));
            };
            Some(Ok(Visit::Entry(WalkItem {
                path: p.to_path_buf(),
                stored,
                kind,
            })))
        })
}
