//! Columnar rendering of container and entry metadata. Diagnostic output
//! only; nothing downstream parses it.

use super::structures::ContainerHeader;
use super::{Container, EntryDescriptor};
use crate::io::ReadAt;

/// Render the container's header and descriptor table as a fixed-width
/// table, one row per entry. Pure; no side effects.
pub fn describe<R: ReadAt>(container: &Container<R>) -> String {
    let mut out = String::new();
    let name = container.source_name();

    match *container.header() {
        ContainerHeader::Afs { entry_count, .. } => {
            out.push_str(&format!("AFS container \"{name}\", {entry_count} files\n\n"));
            out.push_str(&format!(
                "{:>8}  {:>32}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}  {:>10}\n",
                "Index", "Filename", "Size", "Offset", "U1", "U2", "U3", "U4"
            ));
            for (i, e) in container.entries().iter().enumerate() {
                out.push_str(&format!(
                    "{:>8}  {:>32}  {:>10}  {:#010X}  {:#010X}  {:#010X}  {:#010X}  {:#010X}\n",
                    i, e.name, e.stored_size, e.data_offset, e.aux[0], e.aux[1], e.aux[2], e.aux[3]
                ));
            }
        }
        ContainerHeader::Dar {
            entry_count,
            data_region_offset,
            name_region_offset,
            descriptor_table_offset,
        } => {
            out.push_str(&format!("DAR container \"{name}\", {entry_count} files\n"));
            out.push_str(&format!(
                "File data: {data_region_offset:#010X}, File descriptors: \
                 {descriptor_table_offset:#010X}, Filenames: {name_region_offset:#010X}\n\n"
            ));
            let width = name_column_width(container.entries());
            out.push_str(&format!(
                "{:>8}  {:>width$}  {:>10}  {:>11}  {:>10}  {:>10}\n",
                "Index", "Filename", "Compressed", "Stored Size", "Full Size", "Offset"
            ));
            for (i, e) in container.entries().iter().enumerate() {
                out.push_str(&format!(
                    "{:>8}  {:>width$}  {:>10}  {:#011X}  {:#010X}  {:#010X}\n",
                    i, e.name, e.compressed, e.stored_size, e.logical_size, e.data_offset
                ));
            }
        }
        ContainerHeader::Gmp {
            entry_count,
            descriptor_table_offset,
            unknown,
        } => {
            out.push_str(&format!(
                "GMP container \"{name}\": {entry_count} files, descriptor table at \
                 {descriptor_table_offset:#010X}\n"
            ));
            out.push_str(&format!(
                "Unknown header words: {:#010X} {:#010X}\n\n",
                unknown[0], unknown[1]
            ));
            out.push_str(&format!(
                "{:>8}  {:>20}  {:>10}  {:>10}  {:>10}\n",
                "Index", "Filename", "Size", "Offset", "Unknown"
            ));
            for (i, e) in container.entries().iter().enumerate() {
                out.push_str(&format!(
                    "{:>8}  {:>20}  {:>10}  {:#010X}  {:#010X}\n",
                    i, e.name, e.stored_size, e.data_offset, e.aux[0]
                ));
            }
        }
    }
    out
}

fn name_column_width(entries: &[EntryDescriptor]) -> usize {
    entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0)
        .max(8)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{DarEntry, build_afs, build_dar};
    use super::*;
    use crate::container::Format;

    #[test]
    fn afs_report_has_one_row_per_entry() {
        let data = build_afs(&[
            ("a.txt", 0x800, b"A".repeat(0x100)),
            ("b.dat", 0x900, b"B".repeat(0x50)),
        ]);
        let c = Container::from_reader(data, Format::Afs, "stage.afs".into()).unwrap();
        let text = describe(&c);

        assert!(text.contains("AFS container \"stage.afs\", 2 files"));
        assert!(text.contains("a.txt"));
        assert!(text.contains("b.dat"));
        assert!(text.contains("0x00000800"));
        // header line + blank + column header + 2 rows
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn dar_report_shows_region_offsets_and_compression() {
        let c = Container::from_reader(
            build_dar(&[DarEntry::compressed("sub/x.bin", b"data".repeat(40))]),
            Format::Dar,
            "pack.dar".into(),
        )
        .unwrap();
        let text = describe(&c);
        assert!(text.contains("DAR container \"pack.dar\", 1 files"));
        assert!(text.contains("File descriptors:"));
        assert!(text.contains("sub/x.bin"));
        assert!(text.contains("true"));
    }
}
