//! DAR descriptor-table decoder.
//!
//! No signature. 16-byte header: entry count, data-region offset, name-region
//! offset, descriptor-table offset. Each 16-byte descriptor holds a pointer
//! into the name region (NUL-terminated ASCII, `/` allowed as a subdirectory
//! separator), a compressed size, a full size and the data offset. A nonzero
//! compressed size marks the payload as a zlib stream.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use super::structures::{ContainerHeader, EntryDescriptor};
use crate::error::{Error, Result};
use crate::io::{ReadAt, SourceCursor};

const HEADER_LEN: usize = 16;
const DESCRIPTOR_LEN: usize = 16;

/// Chunk size for the bounded NUL-terminator scan.
const NAME_CHUNK: usize = 64;

pub(crate) fn decode<R: ReadAt>(
    cur: &mut SourceCursor<'_, R>,
) -> Result<(ContainerHeader, Vec<EntryDescriptor>)> {
    cur.seek(0);
    let head = cur.read_vec(HEADER_LEN).map_err(|_| {
        Error::MalformedHeader("source shorter than a DAR header".into())
    })?;
    let mut words = Cursor::new(head.as_slice());
    let count = words.read_u32::<LittleEndian>()?;
    let data_region_offset = words.read_u32::<LittleEndian>()?;
    let name_region_offset = words.read_u32::<LittleEndian>()?;
    let descriptor_table_offset = words.read_u32::<LittleEndian>()?;

    let len = cur.source_len();
    let table_end = descriptor_table_offset as u64 + count as u64 * DESCRIPTOR_LEN as u64;
    if table_end > len {
        return Err(Error::MalformedHeader(format!(
            "descriptor table for {count} entries extends past end of source"
        )));
    }
    if data_region_offset as u64 > len || name_region_offset as u64 > len {
        return Err(Error::MalformedHeader(
            "region offsets exceed source length".into(),
        ));
    }

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        cur.seek(descriptor_table_offset as u64 + (i * DESCRIPTOR_LEN) as u64);
        let record = cur.read_vec(DESCRIPTOR_LEN).map_err(|_| {
            Error::MalformedHeader("source ends inside the descriptor table".into())
        })?;
        let mut words = Cursor::new(record.as_slice());
        let name_offset = words.read_u32::<LittleEndian>()?;
        let compressed_size = words.read_u32::<LittleEndian>()?;
        let file_size = words.read_u32::<LittleEndian>()?;
        let data_offset = words.read_u32::<LittleEndian>()?;

        let compressed = compressed_size != 0;
        let (name, malformed_name) = match read_terminated_name(cur, name_offset as u64) {
            Ok(n) if n.is_empty() => (EntryDescriptor::placeholder_name(i), false),
            Ok(n) => (n, false),
            Err(_) => (EntryDescriptor::placeholder_name(i), true),
        };

        entries.push(EntryDescriptor {
            name,
            data_offset: data_offset as u64,
            stored_size: u64::from(if compressed { compressed_size } else { file_size }),
            logical_size: file_size as u64,
            compressed,
            malformed_name,
            aux: Vec::new(),
        });
    }

    let header = ContainerHeader::Dar {
        entry_count: count,
        data_region_offset,
        name_region_offset,
        descriptor_table_offset,
    };
    Ok((header, entries))
}

/// Scan a NUL-terminated ASCII name starting at `offset`.
///
/// The scan is bounded by the end of the source: a name with no terminator
/// fails instead of looping forever.
fn read_terminated_name<R: ReadAt>(
    cur: &mut SourceCursor<'_, R>,
    offset: u64,
) -> std::result::Result<String, &'static str> {
    if offset >= cur.source_len() {
        return Err("name offset past end of source");
    }
    cur.seek(offset);
    let mut bytes = Vec::new();
    loop {
        let chunk_len = (cur.remaining() as usize).min(NAME_CHUNK);
        if chunk_len == 0 {
            return Err("name has no NUL terminator before end of source");
        }
        let chunk = cur
            .read_vec(chunk_len)
            .map_err(|_| "name has no NUL terminator before end of source")?;
        match chunk.iter().position(|&b| b == 0) {
            Some(p) => {
                bytes.extend_from_slice(&chunk[..p]);
                break;
            }
            None => bytes.extend_from_slice(&chunk),
        }
    }
    if !bytes.is_ascii() {
        return Err("non-ASCII bytes in name");
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{DarEntry, build_dar};
    use super::*;
    use crate::error::Error;

    #[test]
    fn decodes_plain_and_compressed_entries() {
        let data = build_dar(&[
            DarEntry::plain("intro.bin", b"plain payload".to_vec()),
            DarEntry::compressed("sub/dir/name.bin", b"zzz".repeat(50)),
        ]);
        let mut cur = SourceCursor::new(&data);
        let (header, entries) = decode(&mut cur).unwrap();

        assert_eq!(header.entry_count(), 2);
        assert_eq!(entries[0].name, "intro.bin");
        assert!(!entries[0].compressed);
        assert_eq!(entries[0].stored_size, 13);
        assert_eq!(entries[0].logical_size, 13);

        assert_eq!(entries[1].name, "sub/dir/name.bin");
        assert!(entries[1].compressed);
        assert_eq!(entries[1].logical_size, 150);
        // stored size is the zlib stream length, not the raw length
        assert_ne!(entries[1].stored_size, 0);
        assert_ne!(entries[1].stored_size, entries[1].logical_size);
    }

    #[test]
    fn unterminated_name_flags_the_entry_but_keeps_siblings() {
        let mut data = build_dar(&[
            DarEntry::plain("good.bin", b"g".repeat(3)),
            DarEntry::plain("tail", b"t".repeat(3)),
        ]);
        // Point the second entry's name at the last byte and make it non-NUL,
        // so the scan hits end-of-source before a terminator.
        let table_off = u32::from_le_bytes(data[12..16].try_into().unwrap()) as usize;
        let last = data.len() as u32 - 1;
        data[table_off + DESCRIPTOR_LEN..table_off + DESCRIPTOR_LEN + 4]
            .copy_from_slice(&last.to_le_bytes());
        *data.last_mut().unwrap() = b'x';

        let mut cur = SourceCursor::new(&data);
        let (_, entries) = decode(&mut cur).unwrap();
        assert!(!entries[0].malformed_name);
        assert_eq!(entries[0].name, "good.bin");
        assert!(entries[1].malformed_name);
        assert_eq!(entries[1].name, "f1");
    }

    #[test]
    fn rejects_a_descriptor_table_past_the_end() {
        let mut data = vec![0u8; 32];
        data[0..4].copy_from_slice(&4u32.to_le_bytes()); // 4 entries
        data[12..16].copy_from_slice(&16u32.to_le_bytes()); // table at 16, needs 64 bytes
        let mut cur = SourceCursor::new(&data);
        assert!(matches!(decode(&mut cur), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn rejects_a_source_shorter_than_the_header() {
        let data = vec![0u8; 7];
        let mut cur = SourceCursor::new(&data);
        assert!(matches!(decode(&mut cur), Err(Error::MalformedHeader(_))));
    }
}
