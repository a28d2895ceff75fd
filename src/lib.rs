//! # unarc
//!
//! Extractor for three game-asset container formats: AFS, DAR and GMP.
//!
//! All three are simple fixed-layout binary archives: a small header giving
//! an entry count and table locations, a per-entry descriptor table with
//! names, offsets and sizes, and raw (optionally zlib-compressed) payloads.
//! This crate decodes the descriptor tables into one common model and
//! extracts payloads to individual files, falling back to the stored bytes
//! when a declared-compressed entry fails to decode.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use unarc::{Container, ExtractOptions, Extractor};
//!
//! fn main() -> unarc::Result<()> {
//!     // Format is sniffed from the signature/extension.
//!     let container = Container::open_path(Path::new("stage.afs"), None)?;
//!     for entry in container.entries() {
//!         println!("{} ({} bytes)", entry.name, entry.stored_size);
//!     }
//!
//!     let extractor = Extractor::new(&container, ExtractOptions::default());
//!     let summary = extractor.extract_all(Path::new("stage_files"));
//!     println!("{} extracted, {} failed", summary.written(), summary.failed());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod container;
pub mod error;
pub mod io;

pub use cli::Cli;
pub use container::{
    Container, ContainerHeader, DirDefault, EntryDescriptor, ExtractOptions, ExtractSummary,
    Extractor, Format, NamingPolicy, describe,
};
pub use error::{Error, Result};
pub use io::{LocalFileReader, ReadAt, SourceCursor};
