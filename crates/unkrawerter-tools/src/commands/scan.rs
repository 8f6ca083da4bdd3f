//! The `scan` subcommand: report discovered pointer tables.
use std::path::Path;

use anyhow::{Context, Result};
use unkrawerter::locate::{classify_runs, scan_pointer_runs, select_offsets, type_name};
use unkrawerter::rip::has_signature;
use unkrawerter::version::{DEFAULT_VERSION, detect_version};

pub fn run(file: &Path, threshold: u32, verbose: bool) -> Result<()> {
    let rom = std::fs::read(file)
        .map_err(unkrawerter::RipError::Io)
        .with_context(|| format!("reading {}", file.display()))?;

    if !has_signature(&rom) {
        eprintln!(
            "warning: no Krawall signature found; this ROM may not use the Krawall engine"
        );
    }
    let detected = detect_version(&rom);
    match detected {
        Some(version) => println!("Engine version {} (detected)", version),
        None => println!("Engine version {} (assumed)", DEFAULT_VERSION),
    }

    let version = detected.unwrap_or(DEFAULT_VERSION);
    let runs = scan_pointer_runs(&rom, threshold);
    let classified = classify_runs(&rom, &runs, version);
    if verbose {
        for c in &classified {
            println!(
                "Found {} matches at {:08X} with type {}",
                c.run.count,
                c.run.offset,
                type_name(c.mask)
            );
        }
    }

    let selected = select_offsets(&classified);
    if selected.instrument_count > 0 {
        println!(
            "> Found instrument list at address {:08X} ({} entries)",
            selected.instrument_addr, selected.instrument_count
        );
    }
    if selected.sample_count > 0 {
        println!(
            "> Found sample list at address {:08X} ({} entries)",
            selected.sample_addr, selected.sample_count
        );
    }
    for module in &selected.modules {
        println!("> Found module at address {:08X}", module);
    }
    if !selected.complete() {
        println!("Not all required tables were found; try another threshold.");
    }
    Ok(())
}
