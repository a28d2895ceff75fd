//! GMP descriptor-table decoder.
//!
//! No signature. 16-byte header: entry count, descriptor-table offset and two
//! opaque words. 32-byte descriptor stride: a 20-byte NUL-padded ASCII name
//! slot, then payload length, payload offset and one opaque word. Payloads
//! are never compressed; an empty name slot gets an `f<index>` placeholder.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use super::structures::{ContainerHeader, EntryDescriptor, decode_fixed_name};
use crate::error::{Error, Result};
use crate::io::{ReadAt, SourceCursor};

const HEADER_LEN: usize = 16;
const NAME_SLOT: usize = 20;
const DESCRIPTOR_LEN: usize = 32;

pub(crate) fn decode<R: ReadAt>(
    cur: &mut SourceCursor<'_, R>,
) -> Result<(ContainerHeader, Vec<EntryDescriptor>)> {
    cur.seek(0);
    let head = cur.read_vec(HEADER_LEN).map_err(|_| {
        Error::MalformedHeader("source shorter than a GMP header".into())
    })?;
    let mut words = Cursor::new(head.as_slice());
    let count = words.read_u32::<LittleEndian>()?;
    let descriptor_table_offset = words.read_u32::<LittleEndian>()?;
    let unknown = [
        words.read_u32::<LittleEndian>()?,
        words.read_u32::<LittleEndian>()?,
    ];

    let table_span = count as u64 * DESCRIPTOR_LEN as u64;
    if descriptor_table_offset as u64 + table_span > cur.source_len() {
        return Err(Error::MalformedHeader(format!(
            "descriptor table for {count} entries extends past end of source"
        )));
    }

    cur.seek(descriptor_table_offset as u64);
    let table = cur.read_vec(table_span as usize).map_err(|_| {
        Error::MalformedHeader("source ends inside the descriptor table".into())
    })?;

    let mut entries = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let record = &table[i * DESCRIPTOR_LEN..(i + 1) * DESCRIPTOR_LEN];
        let (name, malformed_name) = match decode_fixed_name(&record[..NAME_SLOT]) {
            Ok(n) if n.is_empty() => (EntryDescriptor::placeholder_name(i), false),
            Ok(n) => (n, false),
            Err(_) => (EntryDescriptor::placeholder_name(i), true),
        };
        let mut words = Cursor::new(&record[NAME_SLOT..]);
        let length = words.read_u32::<LittleEndian>()?;
        let data_offset = words.read_u32::<LittleEndian>()?;
        let aux = words.read_u32::<LittleEndian>()?;

        entries.push(EntryDescriptor {
            name,
            data_offset: data_offset as u64,
            stored_size: length as u64,
            logical_size: length as u64,
            compressed: false,
            malformed_name,
            aux: vec![aux],
        });
    }

    let header = ContainerHeader::Gmp {
        entry_count: count,
        descriptor_table_offset,
        unknown,
    };
    Ok((header, entries))
}

#[cfg(test)]
mod tests {
    use super::super::testutil::build_gmp;
    use super::*;
    use crate::error::Error;

    #[test]
    fn decodes_entries_and_preserves_aux_words() {
        let data = build_gmp(&[("tiles.dat", b"TILES".to_vec(), 0xDEAD_BEEF), ("", b"anon".to_vec(), 7)]);
        let mut cur = SourceCursor::new(&data);
        let (header, entries) = decode(&mut cur).unwrap();

        assert_eq!(header.entry_count(), 2);
        assert_eq!(entries[0].name, "tiles.dat");
        assert_eq!(entries[0].stored_size, 5);
        assert_eq!(entries[0].aux, vec![0xDEAD_BEEF]);
        // empty name slot gets the synthesized placeholder
        assert_eq!(entries[1].name, "f1");
        assert!(!entries[1].malformed_name);
    }

    #[test]
    fn rejects_a_table_past_the_end() {
        let mut data = vec![0u8; 24];
        data[0..4].copy_from_slice(&3u32.to_le_bytes());
        data[4..8].copy_from_slice(&16u32.to_le_bytes());
        let mut cur = SourceCursor::new(&data);
        assert!(matches!(decode(&mut cur), Err(Error::MalformedHeader(_))));
    }
}
