//! Validate pass.
//!
//! Scans the whole buffer without decoding paths or touching the filesystem,
//! bounding every declared length against what is left. The resulting
//! [`Plan`] is the only way into the extract pass.

use crate::codec::EntryReader;
use crate::error::{ChinError, Field, Result};

/// A buffer that passed validation, with its record count.
#[derive(Debug, Clone, Copy)]
pub struct Plan<'a> {
    data: &'a [u8],
    entries: u64,
}

impl<'a> Plan<'a> {
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Size of the logical archive in bytes.
    pub fn byte_len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn digest(&self) -> blake3::Hash {
        blake3::hash(self.data)
    }

    /// Fresh cursor over the records, from the start.
    pub fn records(&self) -> EntryReader<'a> {
        EntryReader::new(self.data)
    }
}

/// Count the records in `data`.
///
/// A length field that cannot be read at all ends the scan quietly; a length
/// that overruns the buffer is `CorruptArchive`. Zero records is
/// `EmptyArchive`.
pub fn validate(data: &[u8]) -> Result<Plan<'_>> {
    let mut r = EntryReader::new(data);
    let mut entries = 0u64;

    loop {
        let Some(path_len) = r.read_u16() else {
            break;
        };
        skip_declared(&mut r, Field::PathLength, path_len as u64)?;

        let Some(content_len) = r.read_u32() else {
            break;
        };
        skip_declared(&mut r, Field::ContentLength, content_len as u64)?;

        entries += 1;
    }

    if entries == 0 {
        return Err(ChinError::EmptyArchive);
    }
    if r.remaining() > 0 {
        tracing::debug!(
            trailing = r.remaining(),
            offset = r.offset(),
            "trailing bytes after last complete record"
        );
    }
    tracing::info!(entries, bytes = data.len(), "archive validated");
    Ok(Plan { data, entries })
}

fn skip_declared(r: &mut EntryReader<'_>, field: Field, declared: u64) -> Result<()> {
    let available = r.remaining() as u64;
    if declared > available {
        return Err(ChinError::CorruptArchive {
            field,
            declared,
            available,
            offset: r.offset(),
        });
    }
    r.take(declared as usize);
    Ok(())
}
