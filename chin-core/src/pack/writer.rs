use crate::codec::{ArchiveSink, CountingWriter, EntryKind, encode_entry};
use crate::error::{ChinError, Result};
use crate::naming;
use crate::pack::split;
use crate::pack::walker::{Exclusion, SourceSet, Visit, WalkItem};
use crate::progress::{self, Observer};
use crate::util::hash_forward::HashingSink;
use crate::util::sanitize;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct CompressOptions {
    /// Split the output into parts of at most this many MiB.
    pub split_mb: Option<NonZeroU32>,
    /// Directory that receives the archive (or its parts).
    pub out_dir: PathBuf,
    /// Base for multi-source relative paths; the process cwd when `None`.
    pub cwd: Option<PathBuf>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            split_mb: None,
            out_dir: PathBuf::from("."),
            cwd: None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CompressReport {
    /// The archive, or its parts in order.
    pub outputs: Vec<PathBuf>,
    pub entries: u64,
    pub bytes: u64,
    /// BLAKE3 of the logical (unsplit) archive, hex.
    pub digest: String,
}

/// Streams records for every walked object into a sink.
pub struct ArchiveWriter<'o, S: ArchiveSink> {
    sink: S,
    observer: &'o mut dyn Observer,
    entries: u64,
}

impl<'o, S: ArchiveSink> ArchiveWriter<'o, S> {
    pub fn new(sink: S, observer: &'o mut dyn Observer) -> Self {
        Self {
            sink,
            observer,
            entries: 0,
        }
    }

    /// Encode one object. File contents are read whole.
    pub fn write_item(&mut self, item: &WalkItem) -> Result<()> {
        let stored = sanitize::path_bytes(&item.stored)?;
        match item.kind {
            EntryKind::Directory => {
                encode_entry(&mut self.sink, stored, EntryKind::Directory, &[])?;
            }
            EntryKind::File => {
                let data = fs::read(&item.path).map_err(|e| ChinError::fs(&item.path, e))?;
                encode_entry(&mut self.sink, stored, EntryKind::File, &data)?;
            }
        }
        tracing::debug!(path = %item.stored.display(), kind = ?item.kind, "entry written");
        self.entries += 1;
        self.observer.on_entry_processed(&item.stored.to_string_lossy());
        Ok(())
    }

    /// Walk `set` and encode everything not excluded. Any walk or read error
    /// aborts; bytes already appended stay in the sink.
    pub fn write_set(&mut self, set: &SourceSet, exclusion: &Exclusion) -> Result<u64> {
        let before = self.entries;
        for visit in set.walk(exclusion) {
            match visit? {
                Visit::Entry(item) => self.write_item(&item)?,
                Visit::Skipped(path) => progress::warn(
                    &mut *self.observer,
                    format!("Skipping non-regular file: {}", path.display()),
                ),
            }
        }
        Ok(self.entries - before)
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Write every entry of `set` into `sink`; returns the entry count.
pub fn write<S: ArchiveSink>(
    set: &SourceSet,
    exclusion: &Exclusion,
    sink: S,
    observer: &mut dyn Observer,
) -> Result<u64> {
    let mut w = ArchiveWriter::new(sink, observer);
    w.write_set(set, exclusion)
}

/// Pack `sources` into `<out_dir>/<name>.chin`, or into numbered parts when
/// `split_mb` is set.
///
/// One source is stored relative to its parent; several sources are stored
/// relative to the working directory. A failure leaves whatever was already
/// written on disk.
pub fn compress(
    sources: &[PathBuf],
    opts: &CompressOptions,
    observer: &mut dyn Observer,
) -> Result<CompressReport> {
    let Some(first) = sources.first() else {
        return Err(ChinError::NoSources);
    };
    let cwd = match &opts.cwd {
        Some(c) => c.clone(),
        None => std::env::current_dir()?,
    };
    let cwd = sanitize::absolute(&cwd).map_err(|e| ChinError::fs(&cwd, e))?;

    let set = SourceSet::from_sources(sources, &cwd, observer)?;

    let first = sanitize::normalize(&cwd.join(first));
    let name = naming::archive_name(&first, first.is_dir(), sources.len() > 1);
    let out_dir = sanitize::normalize(&cwd.join(&opts.out_dir));
    fs::create_dir_all(&out_dir).map_err(|e| ChinError::fs(&out_dir, e))?;
    let archive = out_dir.join(name);

    let exclusion = match opts.split_mb {
        None => Exclusion::archive(&archive)?,
        Some(_) => Exclusion::parts(&archive)?,
    };
    // the output would be truncated before the walk reaches it
    if let Some(root) = set.roots().iter().find(|r| exclusion.matches(&r.path)) {
        return Err(ChinError::OutputIsSource {
            path: root.path.clone(),
        });
    }

    let total = set.count(&exclusion)?;
    tracing::info!(entries = total, output = %archive.display(), "compressing");
    observer.on_total(total);

    let report = match opts.split_mb {
        None => compress_to_file(&set, &exclusion, &archive, observer)?,
        Some(mb) => compress_split(&set, &exclusion, &archive, mb, observer)?,
    };

    if report.entries == 0 {
        progress::warn(observer, "No entries were written to the archive".to_string());
    }
    tracing::info!(
        entries = report.entries,
        bytes = report.bytes,
        outputs = report.outputs.len(),
        "compression finished"
    );
    Ok(report)
}

fn compress_to_file(
    set: &SourceSet,
    exclusion: &Exclusion,
    archive: &Path,
    observer: &mut dyn Observer,
) -> Result<CompressReport> {
    let file = File::create(archive).map_err(|e| ChinError::fs(archive, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut sink = HashingSink::new(CountingWriter::new(BufWriter::new(file)), &mut hasher);

    let entries = write(set, exclusion, &mut sink, observer).map_err(|e| at_archive(e, archive))?;
    let counting = sink.into_inner();
    let bytes = counting.len();
    counting.finish().map_err(|e| ChinError::fs(archive, e))?;

    Ok(CompressReport {
        outputs: vec![archive.to_path_buf()],
        entries,
        bytes,
        digest: hasher.finalize().to_hex().to_string(),
    })
}

/// Sink I/O failures carry no path of their own; attach the archive's.
fn at_archive(err: ChinError, archive: &Path) -> ChinError {
    match err {
        ChinError::Io(e) => ChinError::fs(archive, e),
        other => other,
    }
}

fn compress_split(
    set: &SourceSet,
    exclusion: &Exclusion,
    archive: &Path,
    mb: NonZeroU32,
    observer: &mut dyn Observer,
) -> Result<CompressReport> {
    let mut buf = Vec::new();
    let entries = write(set, exclusion, &mut buf, observer)?;
    let outputs = split::split(&buf, archive, mb, observer)?;

    Ok(CompressReport {
        outputs,
        entries,
        bytes: buf.len() as u64,
        digest: blake3::hash(&buf).to_hex().to_string(),
    })
}
