//! AFS descriptor-table decoder.
//!
//! Layout: `"AFS\0"` signature, entry count, then one `(offset, length)`
//! pair per entry followed by a trailing pair locating the name table. The
//! name table holds a 48-byte record per entry: a 32-byte NUL-padded ASCII
//! name slot plus four opaque u32 words (U1..U4). Payloads are never
//! compressed.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use super::structures::{ContainerHeader, EntryDescriptor, decode_fixed_name};
use crate::error::{Error, Result};
use crate::io::{ReadAt, SourceCursor};

/// 4-byte signature at offset 0.
pub const MAGIC: &[u8; 4] = b"AFS\x00";

const NAME_SLOT: usize = 32;
const NAME_RECORD: usize = NAME_SLOT + 16;

pub(crate) fn decode<R: ReadAt>(
    cur: &mut SourceCursor<'_, R>,
) -> Result<(ContainerHeader, Vec<EntryDescriptor>)> {
    cur.seek(0);
    let mut magic = [0u8; 4];
    cur.read_exact(&mut magic)
        .map_err(|_| Error::NotAContainer("source shorter than an AFS signature".into()))?;
    if magic != *MAGIC {
        return Err(Error::NotAContainer("missing AFS signature".into()));
    }

    let count = {
        let word = table_read(cur, 4)?;
        Cursor::new(word).read_u32::<LittleEndian>()?
    };

    // entry pairs plus the trailing name-table pair
    let table_len = (count as u64 + 1) * 8;
    if 8 + table_len > cur.source_len() {
        return Err(Error::MalformedHeader(format!(
            "descriptor table for {count} entries extends past end of source"
        )));
    }
    let table = table_read(cur, table_len as usize)?;
    let mut words = Cursor::new(table.as_slice());

    let mut ranges = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let offset = words.read_u32::<LittleEndian>()?;
        let length = words.read_u32::<LittleEndian>()?;
        ranges.push((offset, length));
    }
    let name_table_offset = words.read_u32::<LittleEndian>()?;
    let name_table_len = words.read_u32::<LittleEndian>()?;

    let names_span = count as u64 * NAME_RECORD as u64;
    if name_table_offset as u64 + names_span > cur.source_len() {
        return Err(Error::MalformedHeader(format!(
            "name table at {name_table_offset:#x} extends past end of source"
        )));
    }

    cur.seek(name_table_offset as u64);
    let names = table_read(cur, names_span as usize)?;

    let mut entries = Vec::with_capacity(count as usize);
    for (i, &(offset, length)) in ranges.iter().enumerate() {
        let record = &names[i * NAME_RECORD..(i + 1) * NAME_RECORD];
        let (name, malformed_name) = match decode_fixed_name(&record[..NAME_SLOT]) {
            Ok(n) if n.is_empty() => (EntryDescriptor::placeholder_name(i), false),
            Ok(n) => (n, false),
            Err(_) => (EntryDescriptor::placeholder_name(i), true),
        };
        let mut aux_words = Cursor::new(&record[NAME_SLOT..]);
        let mut aux = Vec::with_capacity(4);
        for _ in 0..4 {
            aux.push(aux_words.read_u32::<LittleEndian>()?);
        }
        entries.push(EntryDescriptor {
            name,
            data_offset: offset as u64,
            stored_size: length as u64,
            logical_size: length as u64,
            compressed: false,
            malformed_name,
            aux,
        });
    }

    let header = ContainerHeader::Afs {
        entry_count: count,
        name_table_offset,
        name_table_len,
    };
    Ok((header, entries))
}

/// Read a header/table region; truncation here means the header lies.
fn table_read<R: ReadAt>(cur: &mut SourceCursor<'_, R>, n: usize) -> Result<Vec<u8>> {
    cur.read_vec(n).map_err(|e| match e {
        Error::TruncatedSource { offset, .. } => Error::MalformedHeader(format!(
            "source ends inside header or descriptor table (offset {offset:#x})"
        )),
        other => other,
    })
}
