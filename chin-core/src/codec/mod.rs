//! Entry codec.
//!
//! One record is `[pathLen: u16 LE][path][contentLen: u32 LE][content]`.
//! Records are written back to back with no header, footer or count. A
//! content length of zero marks a directory, so an empty file cannot be told
//! apart from a directory and round-trips as one. Paths are raw OS bytes; they
//! are not required to be UTF-8.

use crate::error::{ChinError, Field, Result};
use serde::Serialize;
use std::borrow::Cow;
use std::path::PathBuf;

pub mod sink;

pub use sink::{ArchiveSink, CountingWriter};

pub const PATH_LEN_SIZE: usize = 2;
pub const CONTENT_LEN_SIZE: usize = 4;
pub const MAX_PATH_LEN: usize = u16::MAX as usize;
pub const MAX_CONTENT_LEN: u64 = u32::MAX as u64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// Append one record to `sink`; returns the number of bytes written.
///
/// `content` is ignored for directories. Length limits are checked before
/// anything is appended, so a rejected record leaves the sink untouched.
pub fn encode_entry<S: ArchiveSink + ?Sized>(
    sink: &mut S,
    path: impl AsRef<[u8]>,
    kind: EntryKind,
    content: &[u8],
) -> Result<u64> {
    let path_bytes = path.as_ref();
    let display = || PathBuf::from(String::from_utf8_lossy(path_bytes).into_owned());
    let path_len = u16::try_from(path_bytes.len()).map_err(|_| ChinError::PathTooLong {
        path: display(),
        len: path_bytes.len(),
    })?;
    let content = match kind {
        EntryKind::Directory => &[][..],
        EntryKind::File => content,
    };
    let content_len = u32::try_from(content.len()).map_err(|_| ChinError::FileTooLarge {
        path: display(),
        len: content.len() as u64,
    })?;

    sink.append_bytes(&path_len.to_le_bytes())?;
    sink.append_bytes(path_bytes)?;
    sink.append_bytes(&content_len.to_le_bytes())?;
    sink.append_bytes(content)?;

    Ok((PATH_LEN_SIZE + path_bytes.len() + CONTENT_LEN_SIZE + content.len()) as u64)
}

/// One decoded record, borrowing from the archive buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub path: &'a [u8],
    pub content: &'a [u8],
}

impl<'a> Entry<'a> {
    pub fn kind(&self) -> EntryKind {
        if self.content.is_empty() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// The path for display; invalid UTF-8 is replaced.
    pub fn path_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.path)
    }
}

/// Forward-only cursor over an in-memory archive.
///
/// The primitive reads return `None` on a short buffer without consuming
/// anything; callers decide whether that is end-of-stream or corruption.
pub struct EntryReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> EntryReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.pos as u64
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        let b = self.take(PATH_LEN_SIZE)?;
        Some(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        let b = self.take(CONTENT_LEN_SIZE)?;
        Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            return None;
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Some(out)
    }

    /// Decode the next record.
    ///
    /// `Ok(None)` when fewer than two bytes remain, i.e. no further path
    /// length can be read. Any other short read is an error: a path or
    /// content field shorter than its declared length is `CorruptArchive`,
    /// a missing content-length field is `Format`.
    pub fn next_entry(&mut self) -> Result<Option<Entry<'a>>> {
        let Some(path_len) = self.read_u16() else {
            return Ok(None);
        };
        let path = self.take_declared(Field::PathLength, path_len as u64)?;
        let content_len = self.read_u32().ok_or_else(|| {
            ChinError::Format(format!(
                "failed to read data length for path {}: {} bytes left at offset {}",
                String::from_utf8_lossy(path),
                self.remaining(),
                self.pos
            ))
        })?;
        let content = self.take_declared(Field::ContentLength, content_len as u64)?;
        Ok(Some(Entry { path, content }))
    }

    fn take_declared(&mut self, field: Field, declared: u64) -> Result<&'a [u8]> {
        let available = self.remaining() as u64;
        let offset = self.offset();
        if declared > available {
            return Err(ChinError::CorruptArchive {
                field,
                declared,
                available,
                offset,
            });
        }
        Ok(self.take(declared as usize).unwrap_or_default())
    }
}

impl<'a> Iterator for EntryReader<'a> {
    type Item = Result<Entry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_file_and_directory_layout() {
        let mut out = Vec::new();
        let n = encode_entry(&mut out, "a.txt", EntryKind::File, b"hi").unwrap();
        assert_eq!(n, 13);
        let n = encode_entry(&mut out, "b", EntryKind::Directory, b"ignored").unwrap();
        assert_eq!(n, 7);
        assert_eq!(
            out,
            b"\x05\x00a.txt\x02\x00\x00\x00hi\x01\x00b\x00\x00\x00\x00".to_vec()
        );
    }

    #[test]
    fn test_path_too_long_writes_nothing() {
        let mut out = Vec::new();
        let long = "x".repeat(MAX_PATH_LEN + 1);
        let err = encode_entry(&mut out, &long, EntryKind::Directory, &[]).unwrap_err();
        assert!(matches!(err, ChinError::PathTooLong { len, .. } if len == MAX_PATH_LEN + 1));
        assert!(out.is_empty());

        let max = "y".repeat(MAX_PATH_LEN);
        encode_entry(&mut out, &max, EntryKind::Directory, &[]).unwrap();
        assert_eq!(out.len(), PATH_LEN_SIZE + MAX_PATH_LEN + CONTENT_LEN_SIZE);
    }

    #[test]
    fn test_decode_entries_in_order() {
        let buf = b"\x05\x00a.txt\x02\x00\x00\x00hi\x01\x00b\x00\x00\x00\x00";
        let entries: Vec<_> = EntryReader::new(buf).collect::<Result<_>>().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, b"a.txt");
        assert_eq!(entries[0].content, b"hi");
        assert_eq!(entries[0].kind(), EntryKind::File);
        assert_eq!(entries[1].path, b"b");
        assert_eq!(entries[1].kind(), EntryKind::Directory);
    }

    #[test]
    fn test_empty_file_decodes_as_directory() {
        let mut out = Vec::new();
        encode_entry(&mut out, "empty.txt", EntryKind::File, &[]).unwrap();
        let e = EntryReader::new(&out).next_entry().unwrap().unwrap();
        assert_eq!(e.kind(), EntryKind::Directory);
    }

    #[test]
    fn test_short_content_is_corrupt() {
        let buf = b"\x01\x00a\x05\x00\x00\x00abc";
        let err = EntryReader::new(buf).next_entry().unwrap_err();
        match err {
            ChinError::CorruptArchive {
                field,
                declared,
                available,
                offset,
            } => {
                assert_eq!(field, Field::ContentLength);
                assert_eq!(declared, 5);
                assert_eq!(available, 3);
                assert_eq!(offset, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_content_length_is_format_error() {
        let buf = b"\x01\x00a\x00\x00";
        let err = EntryReader::new(buf).next_entry().unwrap_err();
        assert!(matches!(err, ChinError::Format(_)));
    }

    #[test]
    fn test_single_trailing_byte_is_end_of_stream() {
        let mut r = EntryReader::new(b"\x07");
        assert!(r.next_entry().unwrap().is_none());
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn test_non_utf8_path_kept_verbatim() {
        let mut out = Vec::new();
        encode_entry(&mut out, b"caf\xe9", EntryKind::File, b"1").unwrap();
        encode_entry(&mut out, b"caf\xff", EntryKind::File, b"2").unwrap();
        let entries: Vec<_> = EntryReader::new(&out).collect::<Result<_>>().unwrap();
        assert_eq!(entries[0].path, b"caf\xe9");
        assert_eq!(entries[1].path, b"caf\xff");
        assert_eq!(entries[0].path_lossy(), "caf\u{fffd}");
    }

    #[test]
    fn test_offset_tracks_consumed_bytes() {
        let buf = b"\x05\x00a.txt\x02\x00\x00\x00hi\x01\x00b\x00\x00\x00\x00";
        let mut r = EntryReader::new(buf);
        assert_eq!(r.offset(), 0);
        r.next_entry().unwrap();
        assert_eq!(r.offset(), 13);
        r.next_entry().unwrap();
        assert_eq!(r.offset(), buf.len() as u64);
    }
}
