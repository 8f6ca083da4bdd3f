//! The `samples` subcommand: dump every discovered sample as WAV.
use std::path::Path;

use anyhow::{Context, Result};
use unkrawerter::krawall::read_sample;
use unkrawerter::locate::search_offsets;
use unkrawerter::rip::read_pointer_list;
use unkrawerter::version::{DEFAULT_VERSION, detect_version};
use unkrawerter::wav::sample_to_wav;
use unkrawerter::RipError;

pub fn run(file: &Path, output: Option<&Path>, threshold: u32) -> Result<()> {
    let rom = std::fs::read(file)
        .map_err(RipError::Io)
        .with_context(|| format!("reading {}", file.display()))?;

    let version = detect_version(&rom).unwrap_or(DEFAULT_VERSION);
    let offsets = search_offsets(&rom, threshold, version);
    if offsets.sample_count == 0 {
        return Err(RipError::OffsetsNotFound.into());
    }

    let out_dir = output.unwrap_or(Path::new("."));
    let sample_offsets = read_pointer_list(&rom, offsets.sample_addr, offsets.sample_count)
        .map_err(RipError::Parse)?;
    for (i, &offset) in sample_offsets.iter().enumerate() {
        match read_sample(&rom, offset as usize) {
            Ok(sample) => {
                let path = out_dir.join(format!("Sample{}.wav", i));
                std::fs::write(&path, sample_to_wav(&sample))
                    .map_err(RipError::Io)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Wrote {} ({} Hz)", path.display(), sample.c2_freq);
            }
            Err(err) => eprintln!("error: sample {} (offset {:08X}): {}", i, offset, err),
        }
    }
    Ok(())
}
