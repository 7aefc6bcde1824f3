use crate::error::{ChinError, Result};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically resolve `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(c);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Absolute, lexically normalised form of `path` (relative to the process cwd).
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    Ok(normalize(&std::path::absolute(path)?))
}

/// Keep only the normal components, so the result is always relative and
/// never climbs out of wherever it is later joined.
pub fn archive_relative(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Path of `path` relative to `base`, falling back to its own normal
/// components when it does not live under `base`.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    match path.strip_prefix(base) {
        Ok(rel) => archive_relative(rel),
        Err(_) => archive_relative(path),
    }
}

/// Bytes a stored path is written as: the raw OS encoding on Unix.
#[cfg(unix)]
pub fn path_bytes(path: &Path) -> Result<&[u8]> {
    use std::os::unix::ffi::OsStrExt;
    Ok(path.as_os_str().as_bytes())
}

/// Bytes a stored path is written as; must be valid Unicode off Unix.
#[cfg(not(unix))]
pub fn path_bytes(path: &Path) -> Result<&[u8]> {
    path.to_str()
        .map(str::as_bytes)
        .ok_or_else(|| ChinError::Format(format!("path is not valid Unicode: {}", path.display())))
}

/// Inverse of [`path_bytes`].
#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> Result<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Ok(PathBuf::from(std::ffi::OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> Result<PathBuf> {
    std::str::from_utf8(bytes).map(PathBuf::from).map_err(|e| {
        ChinError::Format(format!(
            "stored path {} is not valid UTF-8: {e}",
            String::from_utf8_lossy(bytes)
        ))
    })
}

/// Join a stored path under `root`, refusing anything that could land
/// outside it.
pub fn safe_join(root: &Path, rel: impl AsRef<[u8]>) -> Result<PathBuf> {
    let rel = rel.as_ref();
    let unsafe_path = || ChinError::UnsafePath(String::from_utf8_lossy(rel).into_owned());
    if rel.is_empty() {
        return Err(unsafe_path());
    }
    let p = path_from_bytes(rel)?;
    let escapes = p
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(unsafe_path());
    }
    Ok(root.join(p))
}
