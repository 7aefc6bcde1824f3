use std::io::{self, Write};

/// Destination for encoded records: append bytes, report how many went out.
///
/// Satisfied by an in-memory `Vec<u8>` (used when the archive is split) and by
/// [`CountingWriter`] wrapped around a file.
pub trait ArchiveSink {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Total bytes appended so far.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArchiveSink for Vec<u8> {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn len(&self) -> u64 {
        Vec::len(self) as u64
    }
}

impl<S: ArchiveSink + ?Sized> ArchiveSink for &mut S {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).append_bytes(bytes)
    }

    fn len(&self) -> u64 {
        (**self).len()
    }
}

/// Small Write adapter that counts bytes written
pub struct CountingWriter<W: Write> {
    inner: W,
    n: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, n: 0 }
    }

    /// Flush and hand back the wrapped writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let k = self.inner.write(buf)?;
        self.n += k as u64;
        Ok(k)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> ArchiveSink for CountingWriter<W> {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.n += bytes.len() as u64;
        Ok(())
    }

    fn len(&self) -> u64 {
        self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_tracks_length() {
        let mut v: Vec<u8> = Vec::new();
        v.append_bytes(b"abc").unwrap();
        v.append_bytes(b"").unwrap();
        v.append_bytes(b"de").unwrap();
        assert_eq!(ArchiveSink::len(&v), 5);
        assert_eq!(v, b"abcde");
    }

    #[test]
    fn test_counting_writer_counts_appends_and_writes() {
        let mut w = CountingWriter::new(Vec::new());
        w.append_bytes(&[1, 2, 3]).unwrap();
        w.write_all(&[4]).unwrap();
        assert_eq!(ArchiveSink::len(&w), 4);
        assert_eq!(w.finish().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn fill<S: ArchiveSink>(mut sink: S) -> u64 {
            sink.append_bytes(b"xy").unwrap();
            sink.len()
        }
        let mut v: Vec<u8> = vec![0];
        assert_eq!(fill(&mut v), 3);
        assert_eq!(v, b"\0xy");
    }
}
