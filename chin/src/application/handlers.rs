use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Instant;

use chin_core::error::{ChinError, Result};
use chin_core::{CompressOptions, EntryKind, NoopObserver, compress, decompress, list, verify};

use crate::presentation::format::{format_duration, format_file_size};
use crate::presentation::progress::CliProgress;

pub fn handle_compress(
    sources: Vec<PathBuf>,
    split_mb: Option<NonZeroU32>,
    out_dir: PathBuf,
    quiet: bool,
) -> Result<()> {
    let opts = CompressOptions {
        split_mb,
        out_dir,
        ..Default::default()
    };
    tracing::debug!(?opts, sources = sources.len(), "compress");
    let started = Instant::now();
    let mut progress = CliProgress::new("adding", quiet);
    let report = compress(&sources, &opts, &mut progress);
    progress.finish();
    let report = report?;

    for out in &report.outputs {
        println!("{}", out.display());
    }
    eprintln!(
        "compress: {} entries, {} in {} part(s), {}",
        report.entries,
        format_file_size(report.bytes),
        report.outputs.len(),
        format_duration(started.elapsed())
    );
    eprintln!("blake3: {}", report.digest);
    report_warnings(&progress);
    Ok(())
}

pub fn handle_decompress(archive: PathBuf, dest: PathBuf, quiet: bool) -> Result<()> {
    tracing::debug!(archive = %archive.display(), dest = %dest.display(), "decompress");
    let started = Instant::now();
    let mut progress = CliProgress::new("extracting", quiet);
    let stats = decompress(&archive, &dest, &mut progress);
    progress.finish();
    let stats = stats?;

    eprintln!(
        "decompress: {} files, {} dirs into {} ({})",
        stats.files,
        stats.dirs,
        dest.display(),
        format_duration(started.elapsed())
    );
    report_warnings(&progress);
    Ok(())
}

pub fn handle_verify(archive: PathBuf) -> Result<()> {
    let report = verify(&archive, &mut NoopObserver)?;
    println!("{}  {}", report.digest, archive.display());
    eprintln!(
        "verify: OK ({} entries, {})",
        report.entries,
        format_file_size(report.bytes)
    );
    Ok(())
}

pub fn handle_list(archive: PathBuf, json: bool) -> Result<()> {
    let rows = list(&archive, &mut NoopObserver)?;
    if json {
        let text = serde_json::to_string_pretty(&rows)
            .map_err(|e| ChinError::Format(format!("json encode: {e}")))?;
        println!("{text}");
        return Ok(());
    }
    for r in &rows {
        match r.kind {
            EntryKind::Directory => println!("{:>12}  {}/", "", r.path),
            EntryKind::File => println!("{:>12}  {}", format_file_size(r.size), r.path),
        }
    }
    Ok(())
}

fn report_warnings(progress: &CliProgress) {
    if progress.warnings() > 0 {
        eprintln!("{} warning(s); see log output above", progress.warnings());
    }
}
