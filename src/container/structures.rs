//! Decoded header and per-entry descriptor types shared by all formats.

/// Header fields of a decoded container, tagged by format variant.
///
/// Every field is a little-endian u32 on disk; unknown words are preserved
/// verbatim so `describe()` can surface them.
#[derive(Debug, Clone)]
pub enum ContainerHeader {
    Afs {
        entry_count: u32,
        name_table_offset: u32,
        name_table_len: u32,
    },
    Dar {
        entry_count: u32,
        data_region_offset: u32,
        name_region_offset: u32,
        descriptor_table_offset: u32,
    },
    Gmp {
        entry_count: u32,
        descriptor_table_offset: u32,
        unknown: [u32; 2],
    },
}

impl ContainerHeader {
    pub fn entry_count(&self) -> u32 {
        match *self {
            ContainerHeader::Afs { entry_count, .. }
            | ContainerHeader::Dar { entry_count, .. }
            | ContainerHeader::Gmp { entry_count, .. } => entry_count,
        }
    }
}

/// One contained file, as decoded from the descriptor table.
///
/// Created once at container-open time and immutable thereafter; the vector
/// order is the on-disk table order and doubles as the stable external index.
#[derive(Debug, Clone)]
pub struct EntryDescriptor {
    /// Decoded name, or a synthesized `f<index>` placeholder when the stored
    /// name is empty or could not be decoded. May contain `/` separators
    /// (DAR) denoting a relative subdirectory.
    pub name: String,
    /// Absolute byte offset of the payload in the source.
    pub data_offset: u64,
    /// Bytes occupied in the source (compressed size for compressed entries).
    pub stored_size: u64,
    /// Decompressed size; equals `stored_size` for uncompressed entries.
    pub logical_size: u64,
    /// Whether the stored bytes are a zlib stream.
    pub compressed: bool,
    /// Set when the stored name failed to decode; extraction of this entry
    /// fails with `MalformedName` while sibling entries stay usable.
    pub malformed_name: bool,
    /// Opaque per-entry words (AFS U1..U4, GMP unknown), pass-through only.
    pub aux: Vec<u32>,
}

impl EntryDescriptor {
    pub(crate) fn placeholder_name(index: usize) -> String {
        format!("f{index}")
    }
}

/// Decode a fixed-width NUL-padded ASCII name slot.
///
/// The name runs up to the first NUL (or the whole slot). Non-ASCII bytes are
/// a decode failure; an empty name is valid and left to the caller to replace
/// with a placeholder.
pub(crate) fn decode_fixed_name(slot: &[u8]) -> Result<String, &'static str> {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    let raw = &slot[..end];
    if !raw.is_ascii() {
        return Err("non-ASCII bytes in name slot");
    }
    Ok(String::from_utf8_lossy(raw).into_owned())
}
