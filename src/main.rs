//! Main entry point for the unarc CLI.
//!
//! Opens a container file, then either prints its descriptor table (info
//! mode) or extracts entries to a destination directory.

use anyhow::{Result, anyhow};
use clap::Parser;

use unarc::{Cli, Container, ExtractOptions, Extractor, Format, describe};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = match cli.format.as_deref() {
        Some(s) => Some(
            Format::from_name(s)
                .ok_or_else(|| anyhow!("unknown format '{s}' (expected afs, dar or gmp)"))?,
        ),
        None => None,
    };

    // Open-level failures (bad signature, malformed header) abort here.
    let container = Container::open_path(&cli.file, format)?;

    if cli.info {
        print!("{}", describe(&container));
        return Ok(());
    }

    let dest = cli
        .dir
        .clone()
        .unwrap_or_else(|| container.default_output_dir());
    let extractor = Extractor::new(
        &container,
        ExtractOptions {
            offset_prefix: cli.prefix_override(),
        },
    );

    // Single-entry mode: errors surface directly to the caller.
    if !cli.entries.is_empty() {
        for &external in &cli.entries {
            let index = container.resolve_index(external, cli.base)?;
            let path = extractor.extract_one(index, &dest)?;
            if !cli.quiet {
                println!(
                    "  extracting: {} -> {}",
                    container.entry(index)?.name,
                    path.display()
                );
            }
        }
        return Ok(());
    }

    // Batch mode: per-entry failures are reported and the run continues.
    let summary = extractor.extract_all(&dest);
    for (index, result) in &summary.results {
        let name = container
            .entry(*index)
            .map(|e| e.name.clone())
            .unwrap_or_default();
        match result {
            Ok(path) => {
                if cli.verbose {
                    println!("  {index:>4}  {name} -> {}", path.display());
                }
            }
            Err(e) => eprintln!("  {index:>4}  {name}: {e}"),
        }
    }
    if !cli.quiet {
        let mut line = format!(
            "{} of {} entries extracted to {}",
            summary.written(),
            container.entry_count(),
            dest.display()
        );
        if summary.failed() > 0 {
            line.push_str(&format!(", {} failed", summary.failed()));
        }
        if !summary.fallbacks.is_empty() {
            line.push_str(&format!(
                ", {} written raw after failed decompression",
                summary.fallbacks.len()
            ));
        }
        println!("{line}");
    }

    Ok(())
}
