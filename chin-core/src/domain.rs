use crate::codec::EntryKind;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    /// Display form of the stored path; invalid UTF-8 is replaced.
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
    /// Byte offset of the record inside the logical archive.
    pub offset: u64,
}
