use crate::domain::EntryRow;
use crate::error::Result;
use crate::progress::Observer;
use crate::read::extract::load_archive;
use crate::read::plan::{Plan, validate};
use std::path::Path;

/// Decode every record of a validated archive without touching the filesystem.
pub fn rows(plan: &Plan<'_>) -> Result<Vec<EntryRow>> {
    let mut r = plan.records();
    let mut out = Vec::with_capacity(plan.entries() as usize);
    loop {
        let offset = r.offset();
        let Some(e) = r.next_entry()? else {
            break;
        };
        out.push(EntryRow {
            path: e.path_lossy().into_owned(),
            kind: e.kind(),
            size: e.size(),
            offset,
        });
    }
    Ok(out)
}

/// List the entries of an archive (plain file or any part of a split set).
pub fn list(archive: &Path, observer: &mut dyn Observer) -> Result<Vec<EntryRow>> {
    let data = load_archive(archive, observer)?;
    let plan = validate(&data)?;
    rows(&plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::EntryKind;
    use crate::progress::NoopObserver;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_rows_with_offsets() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("l.chin");
        fs::write(&archive, b"\x05\x00a.txt\x02\x00\x00\x00hi\x01\x00b\x00\x00\x00\x00").unwrap();

        let rows = list(&archive, &mut NoopObserver).unwrap();
        assert_eq!(
            rows,
            vec![
                EntryRow {
                    path: "a.txt".to_string(),
                    kind: EntryKind::File,
                    size: 2,
                    offset: 0
                },
                EntryRow {
                    path: "b".to_string(),
                    kind: EntryKind::Directory,
                    size: 0,
                    offset: 13
                },
            ]
        );
        assert!(!tmp.path().join("a.txt").exists());
    }
}
