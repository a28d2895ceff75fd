//! Extraction engine: stream entry payloads to files under a destination
//! directory.
//!
//! Declared-compressed entries that fail to decode are written raw after a
//! warning; some containers in the wild flag entries compressed that are not,
//! and losing them would be worse than emitting the stored bytes.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::ZlibDecoder;

use super::Container;
use super::structures::EntryDescriptor;
use crate::error::{Error, Result};
use crate::io::{ReadAt, SourceCursor};

/// Extraction configuration, threaded through calls instead of living in
/// process-wide state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Override the per-format offset-prefix policy; `None` keeps it.
    pub offset_prefix: Option<bool>,
}

/// Outcome of a batch extraction. Per-entry failures are collected here
/// rather than aborting the run.
pub struct ExtractSummary {
    /// One result per entry, in table order.
    pub results: Vec<(usize, Result<PathBuf>)>,
    /// Entries written raw after their declared compression failed to decode.
    pub fallbacks: Vec<usize>,
}

impl ExtractSummary {
    pub fn written(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.written()
    }
}

/// Extracts entries of one container.
pub struct Extractor<'a, R: ReadAt> {
    container: &'a Container<R>,
    opts: ExtractOptions,
}

impl<'a, R: ReadAt> Extractor<'a, R> {
    pub fn new(container: &'a Container<R>, opts: ExtractOptions) -> Self {
        Self { container, opts }
    }

    /// Read one entry's payload into memory, decompressing when flagged.
    ///
    /// Returns the bytes plus whether the raw stored bytes were used because
    /// decompression failed (a recoverable condition, not an error).
    pub fn read_entry(&self, index: usize) -> Result<(Vec<u8>, bool)> {
        let entry = self.container.entry(index)?;
        if entry.malformed_name {
            return Err(Error::MalformedName {
                index,
                reason: "name could not be decoded at open time",
            });
        }

        let mut cur = SourceCursor::new(self.container.reader());
        cur.seek(entry.data_offset);
        let stored = cur.read_vec(entry.stored_size as usize)?;

        if !entry.compressed {
            return Ok((stored, false));
        }
        let mut decoded = Vec::with_capacity(entry.logical_size as usize);
        match ZlibDecoder::new(stored.as_slice()).read_to_end(&mut decoded) {
            Ok(_) => Ok((decoded, false)),
            Err(_) => Ok((stored, true)),
        }
    }

    /// Compute the output path for an entry under `dest`, honoring embedded
    /// `/` separators and the offset-prefix policy.
    pub fn output_path(&self, index: usize, dest: &Path) -> Result<PathBuf> {
        let entry = self.container.entry(index)?;
        let prefix = self
            .opts
            .offset_prefix
            .unwrap_or(self.container.format().naming().offset_prefix);
        Ok(build_output_path(entry, index, dest, prefix))
    }

    /// Extract a single entry, returning the written path.
    pub fn extract_one(&self, index: usize, dest: &Path) -> Result<PathBuf> {
        let (path, fell_back) = self.extract_inner(index, dest)?;
        if fell_back {
            report_fallback(index, &path);
        }
        Ok(path)
    }

    /// Extract every entry in ascending table order.
    ///
    /// Per-entry failures (truncated payloads, malformed names) are recorded
    /// and the batch moves on to the next entry.
    pub fn extract_all(&self, dest: &Path) -> ExtractSummary {
        let mut summary = ExtractSummary {
            results: Vec::with_capacity(self.container.entry_count()),
            fallbacks: Vec::new(),
        };
        for index in 0..self.container.entry_count() {
            match self.extract_inner(index, dest) {
                Ok((path, fell_back)) => {
                    if fell_back {
                        report_fallback(index, &path);
                        summary.fallbacks.push(index);
                    }
                    summary.results.push((index, Ok(path)));
                }
                Err(e) => summary.results.push((index, Err(e))),
            }
        }
        summary
    }

    fn extract_inner(&self, index: usize, dest: &Path) -> Result<(PathBuf, bool)> {
        let (data, fell_back) = self.read_entry(index)?;
        let path = self.output_path(index, dest)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_atomic(&path, &data)?;
        Ok((path, fell_back))
    }
}

fn report_fallback(index: usize, path: &Path) {
    eprintln!(
        "warning: entry {index} failed to decompress despite being flagged compressed; \
         wrote stored bytes to {}",
        path.display()
    );
}

fn build_output_path(
    entry: &EntryDescriptor,
    index: usize,
    dest: &Path,
    offset_prefix: bool,
) -> PathBuf {
    let mut components: Vec<&str> = entry.name.split('/').filter(|c| !c.is_empty()).collect();
    let placeholder = EntryDescriptor::placeholder_name(index);
    let file_name = components.pop().unwrap_or(placeholder.as_str());

    let mut path = dest.to_path_buf();
    for dir in components {
        path.push(dir);
    }
    if offset_prefix {
        path.push(format!("{:08X}_{file_name}", entry.data_offset));
    } else {
        path.push(file_name);
    }
    path
}

/// Write to a sibling `.part` file, then rename over the target, so a crash
/// mid-write never leaves a half-written output under the final name.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".part");
    let tmp = PathBuf::from(tmp_name);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)
}
