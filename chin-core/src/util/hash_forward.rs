use crate::codec::ArchiveSink;
use std::io;

/// Sink adapter that feeds every appended byte to a BLAKE3 hasher.
pub struct HashingSink<'a, S: ArchiveSink> {
    inner: S,
    hasher: &'a mut blake3::Hasher,
}

impl<'a, S: ArchiveSink> HashingSink<'a, S> {
    pub fn new(inner: S, hasher: &'a mut blake3::Hasher) -> Self {
        Self { inner, hasher }
    }
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<'a, S: ArchiveSink> ArchiveSink for HashingSink<'a, S> {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.hasher.update(bytes);
        self.inner.append_bytes(bytes)
    }

    fn len(&self) -> u64 {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_matches_one_shot_hash() {
        let mut hasher = blake3::Hasher::new();
        let mut sink = HashingSink::new(Vec::new(), &mut hasher);
        sink.append_bytes(b"hello ").unwrap();
        sink.append_bytes(b"world").unwrap();
        let out = sink.into_inner();
        assert_eq!(out, b"hello world");
        assert_eq!(hasher.finalize(), blake3::hash(b"hello world"));
    }
}
