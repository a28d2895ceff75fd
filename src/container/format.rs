//! The closed set of supported container formats and their naming policies.

use std::path::Path;

use crate::io::ReadAt;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Afs,
    Dar,
    Gmp,
}

impl Format {
    /// Parse a user-supplied format name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "afs" => Some(Format::Afs),
            "dar" => Some(Format::Dar),
            "gmp" => Some(Format::Gmp),
            _ => None,
        }
    }

    /// Detect the format of a source: AFS by its signature, the un-magicked
    /// formats by file extension.
    pub fn detect<R: ReadAt>(reader: &R, path: &Path) -> Option<Self> {
        let mut magic = [0u8; 4];
        if let Ok(4) = reader.read_at(0, &mut magic) {
            if magic == *super::afs::MAGIC {
                return Some(Format::Afs);
            }
        }
        let ext = path.extension()?.to_str()?;
        Format::from_name(ext)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Format::Afs => "AFS",
            Format::Dar => "DAR",
            Format::Gmp => "GMP",
        }
    }

    /// Output-naming rules for this format.
    pub fn naming(&self) -> NamingPolicy {
        match self {
            Format::Afs => NamingPolicy {
                offset_prefix: true,
                dir_default: DirDefault::StemFiles,
            },
            Format::Dar => NamingPolicy {
                offset_prefix: true,
                dir_default: DirDefault::Stem,
            },
            Format::Gmp => NamingPolicy {
                offset_prefix: false,
                dir_default: DirDefault::NameFiles,
            },
        }
    }
}

/// How extracted files and the default destination directory are named.
#[derive(Debug, Clone, Copy)]
pub struct NamingPolicy {
    /// Prefix each output filename with the entry's 8-hex-digit data offset
    /// (disambiguates same-named entries and preserves provenance).
    pub offset_prefix: bool,
    /// Rule for the destination directory when the caller gives none.
    pub dir_default: DirDefault,
}

/// Destination-directory defaulting rules; the original tools disagree on
/// this per format, so it is policy data rather than a hardcoded choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirDefault {
    /// `<stem>_files` (source name up to the first dot).
    StemFiles,
    /// `<stem>` with no suffix.
    Stem,
    /// `<full source name>_files` (extension kept).
    NameFiles,
}

impl DirDefault {
    pub fn dir_for(&self, source_name: &str) -> String {
        let stem = source_name.split('.').next().unwrap_or(source_name);
        match self {
            DirDefault::StemFiles => format!("{stem}_files"),
            DirDefault::Stem => stem.to_string(),
            DirDefault::NameFiles => format!("{source_name}_files"),
        }
    }
}
