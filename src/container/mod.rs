//! Container model: one decoded archive plus its backing source.
//!
//! The module is organized around one decoding abstraction shared by three
//! formats:
//!
//! - [`format`]: the closed [`Format`] enum plus per-format naming policy
//! - [`afs`] / [`dar`] / [`gmp`]: descriptor-table decoders, one per format
//! - [`structures`]: the common header and entry-descriptor types
//! - [`extractor`]: payload extraction with decompression fallback
//! - [`report`]: columnar info rendering

mod afs;
mod dar;
mod extractor;
mod format;
mod gmp;
mod report;
mod structures;

pub use extractor::{ExtractOptions, ExtractSummary, Extractor};
pub use format::{DirDefault, Format, NamingPolicy};
pub use report::describe;
pub use structures::{ContainerHeader, EntryDescriptor};

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::{LocalFileReader, ReadAt, SourceCursor};

/// A decoded container: header, ordered entry descriptors and the exclusively
/// owned backing source. Entries never change after open; dropping the
/// container closes the source.
pub struct Container<R: ReadAt> {
    reader: R,
    /// Absolute source path, kept so a dropped-and-deferred container can be
    /// reopened for late extraction work.
    path: Option<PathBuf>,
    source_name: String,
    format: Format,
    header: ContainerHeader,
    entries: Vec<EntryDescriptor>,
}

impl Container<LocalFileReader> {
    /// Open and decode a container file.
    ///
    /// With no `format` override the file is sniffed: AFS by signature, the
    /// un-magicked formats by extension.
    pub fn open_path(path: &Path, format: Option<Format>) -> Result<Self> {
        let reader = LocalFileReader::new(path)?;
        let format = match format {
            Some(f) => f,
            None => Format::detect(&reader, path)
                .ok_or_else(|| Error::NotAContainer(path.display().to_string()))?,
        };
        let source_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let abs = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let mut container = Self::from_reader(reader, format, source_name)?;
        container.path = Some(abs);
        Ok(container)
    }

    /// Reopen the backing file from the stored path.
    ///
    /// Recovery path for deferred extraction after the original handle is
    /// gone; the already-decoded descriptors are kept as-is.
    pub fn reopen(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "container has no backing path to reopen",
            ))
        })?;
        self.reader = LocalFileReader::new(&path)?;
        Ok(())
    }
}

impl<R: ReadAt> Container<R> {
    /// Decode a container from any random-access source.
    pub fn from_reader(reader: R, format: Format, source_name: String) -> Result<Self> {
        let (header, entries) = {
            let mut cur = SourceCursor::new(&reader);
            match format {
                Format::Afs => afs::decode(&mut cur),
                Format::Dar => dar::decode(&mut cur),
                Format::Gmp => gmp::decode(&mut cur),
            }?
        };
        Ok(Self {
            reader,
            path: None,
            source_name,
            format,
            header,
            entries,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Entries in on-disk table order (the stable external index order).
    pub fn entries(&self) -> &[EntryDescriptor] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Result<&EntryDescriptor> {
        self.entries.get(index).ok_or(Error::IndexOutOfRange {
            index: index as i64,
            count: self.entries.len(),
        })
    }

    /// Map an externally numbered index (e.g. from a 1-based listing) onto
    /// the internal 0-based table order.
    pub fn resolve_index(&self, external: i64, base: i64) -> Result<usize> {
        let idx = external - base;
        if idx < 0 || idx as usize >= self.entries.len() {
            return Err(Error::IndexOutOfRange {
                index: external,
                count: self.entries.len(),
            });
        }
        Ok(idx as usize)
    }

    /// Destination directory implied by the per-format naming policy.
    pub fn default_output_dir(&self) -> PathBuf {
        PathBuf::from(self.format.naming().dir_default.dir_for(&self.source_name))
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::ZlibEncoder;

    /// Build an AFS image from `(name, data_offset, payload)` triples.
    /// Payload offsets must sit past the name table.
    pub(crate) fn build_afs(entries: &[(&str, u32, Vec<u8>)]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"AFS\x00");
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        for (_, offset, payload) in entries {
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        }
        let name_table_offset = (out.len() + 8) as u32;
        out.extend_from_slice(&name_table_offset.to_le_bytes());
        out.extend_from_slice(&((entries.len() * 48) as u32).to_le_bytes());
        for (name, _, _) in entries {
            let mut slot = [0u8; 32];
            slot[..name.len()].copy_from_slice(name.as_bytes());
            out.extend_from_slice(&slot);
            out.extend_from_slice(&[0u8; 16]);
        }
        for (_, offset, payload) in entries {
            let end = *offset as usize + payload.len();
            if out.len() < end {
                out.resize(end, 0);
            }
            out[*offset as usize..end].copy_from_slice(payload);
        }
        out
    }

    pub(crate) struct DarEntry {
        pub name: String,
        pub stored: Vec<u8>,
        pub full_size: u32,
        pub compressed: bool,
    }

    impl DarEntry {
        pub fn plain(name: &str, payload: Vec<u8>) -> Self {
            Self {
                name: name.into(),
                full_size: payload.len() as u32,
                stored: payload,
                compressed: false,
            }
        }

        /// Entry whose stored bytes are a valid zlib stream of `raw`.
        pub fn compressed(name: &str, raw: Vec<u8>) -> Self {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(&raw).unwrap();
            let stored = enc.finish().unwrap();
            Self {
                name: name.into(),
                full_size: raw.len() as u32,
                stored,
                compressed: true,
            }
        }

        /// Entry flagged compressed whose stored bytes are not a zlib stream.
        pub fn bogus_compressed(name: &str, garbage: Vec<u8>) -> Self {
            Self {
                name: name.into(),
                full_size: garbage.len() as u32,
                stored: garbage,
                compressed: true,
            }
        }
    }

    /// Build a DAR image: header, descriptor table, name region, data region.
    pub(crate) fn build_dar(entries: &[DarEntry]) -> Vec<u8> {
        let table_off = 16usize;
        let names_off = table_off + entries.len() * 16;
        let mut name_offsets = Vec::new();
        let mut names = Vec::new();
        for e in entries {
            name_offsets.push((names_off + names.len()) as u32);
            names.extend_from_slice(e.name.as_bytes());
            names.push(0);
        }
        let data_off = names_off + names.len();
        let mut data_offsets = Vec::new();
        let mut data = Vec::new();
        for e in entries {
            data_offsets.push((data_off + data.len()) as u32);
            data.extend_from_slice(&e.stored);
        }

        let mut out = Vec::new();
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data_off as u32).to_le_bytes());
        out.extend_from_slice(&(names_off as u32).to_le_bytes());
        out.extend_from_slice(&(table_off as u32).to_le_bytes());
        for (i, e) in entries.iter().enumerate() {
            out.extend_from_slice(&name_offsets[i].to_le_bytes());
            let compressed_size = if e.compressed { e.stored.len() as u32 } else { 0 };
            out.extend_from_slice(&compressed_size.to_le_bytes());
            out.extend_from_slice(&e.full_size.to_le_bytes());
            out.extend_from_slice(&data_offsets[i].to_le_bytes());
        }
        out.extend_from_slice(&names);
        out.extend_from_slice(&data);
        out
    }

    /// Build a GMP image from `(name, payload, aux)` triples.
    pub(crate) fn build_gmp(entries: &[(&str, Vec<u8>, u32)]) -> Vec<u8> {
        let table_off = 16usize;
        let data_off = table_off + entries.len() * 32;
        let mut out = Vec::new();
        out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
        out.extend_from_slice(&(table_off as u32).to_le_bytes());
        out.extend_from_slice(&0x1111_1111u32.to_le_bytes());
        out.extend_from_slice(&0x2222_2222u32.to_le_bytes());
        let mut data = Vec::new();
        for (name, payload, aux) in entries {
            let mut slot = [0u8; 20];
            slot[..name.len()].copy_from_slice(name.as_bytes());
            out.extend_from_slice(&slot);
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&((data_off + data.len()) as u32).to_le_bytes());
            out.extend_from_slice(&aux.to_le_bytes());
            data.extend_from_slice(payload);
        }
        out.extend_from_slice(&data);
        out
    }
}
