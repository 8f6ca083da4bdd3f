//! The candidate classifier: decide what kind of Krawall table a pointer
//! run is by structurally validating what its entries point at.
//!
//! Classification is deliberately lossy and silent: every check that fails
//! just clears a bit from the candidate's type mask, and only candidates
//! that end up with exactly one bit set are kept.
use crate::binutil::{
    ParseError, ROM_OFFSET_MASK, is_rom_pointer, read_u8_at, read_u16_le_at, read_u32_le_at,
};
use crate::krawall::MODULE_HEADER_LEN;
use crate::locate::scan::PointerRun;
use crate::version::EngineVersion;

/// Type-mask bit: the run is a module's pattern pointer table.
pub const TYPE_MODULE: u8 = 0b001;
/// Type-mask bit: the run is the sample list.
pub const TYPE_SAMPLE: u8 = 0b010;
/// Type-mask bit: the run is the instrument list.
pub const TYPE_INSTRUMENT: u8 = 0b100;

/// Human-readable name for a type mask, indexed by the mask value.
pub fn type_name(mask: u8) -> &'static str {
    const NAMES: [&str; 8] = [
        "unknown",
        "module",
        "sample",
        "module or sample",
        "instrument",
        "instrument or module",
        "instrument or sample",
        "any",
    ];
    NAMES[(mask & 7) as usize]
}

/// A scanned run together with its classified type mask.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedRun {
    pub run: PointerRun,
    pub mask: u8,
}

/// The selected discovery result: one instrument list, one sample list and
/// every module header.
#[derive(Debug, Clone, Default)]
pub struct OffsetSearch {
    pub instrument_addr: u32,
    pub instrument_count: u32,
    pub sample_addr: u32,
    pub sample_count: u32,
    /// Module header file offsets (each 364 bytes before its pattern table).
    pub modules: Vec<u32>,
}

impl OffsetSearch {
    /// Whether everything a rip needs was found.
    pub fn complete(&self) -> bool {
        self.instrument_count > 0 && self.sample_count > 0 && !self.modules.is_empty()
    }
}

/// Compute the type mask of one run.
pub fn classify_run(rom: &[u8], run: &PointerRun, version: EngineVersion) -> u8 {
    let mut mask = 0u8;
    if check_module(rom, run, version).unwrap_or(false) {
        mask |= TYPE_MODULE;
    }
    if check_samples(rom, run).unwrap_or(false) {
        mask |= TYPE_SAMPLE;
    }
    if check_instruments(rom, run).unwrap_or(false) {
        mask |= TYPE_INSTRUMENT;
    }
    mask
}

/// Classify every run.
pub fn classify_runs(
    rom: &[u8],
    runs: &[PointerRun],
    version: EngineVersion,
) -> Vec<ClassifiedRun> {
    runs.iter()
        .map(|run| ClassifiedRun {
            run: *run,
            mask: classify_run(rom, run, version),
        })
        .collect()
}

/// Filter classified runs down to the selection a rip uses: all
/// unambiguous modules, and the largest unambiguous sample and instrument
/// lists.
pub fn select_offsets(classified: &[ClassifiedRun]) -> OffsetSearch {
    let mut result = OffsetSearch::default();
    for c in classified {
        match c.mask {
            TYPE_MODULE => {
                if c.run.offset as usize >= MODULE_HEADER_LEN {
                    result.modules.push(c.run.offset - MODULE_HEADER_LEN as u32);
                }
            }
            TYPE_SAMPLE if c.run.count > result.sample_count => {
                result.sample_count = c.run.count;
                result.sample_addr = c.run.offset;
            }
            TYPE_INSTRUMENT if c.run.count > result.instrument_count => {
                result.instrument_count = c.run.count;
                result.instrument_addr = c.run.offset;
            }
            _ => {}
        }
    }
    result
}

/// Scan, classify and select in one step.
pub fn search_offsets(rom: &[u8], threshold: u32, version: EngineVersion) -> OffsetSearch {
    let runs = crate::locate::scan::scan_pointer_runs(rom, threshold);
    select_offsets(&classify_runs(rom, &runs, version))
}

/// Module check: treat the run as a pattern pointer table and validate the
/// eight header bytes that precede it (initial speed, initial BPM, the five
/// boolean flags and the padding byte), then sanity-check the first pattern
/// it points at.
fn check_module(rom: &[u8], run: &PointerRun, version: EngineVersion) -> Result<bool, ParseError> {
    let table = run.offset as usize;
    if table < 8 {
        return Ok(false);
    }
    let speed = read_u8_at(rom, table - 8)?;
    if speed == 0 || speed > 0x10 {
        return Ok(false);
    }
    let bpm = read_u8_at(rom, table - 7)?;
    if !(30..=200).contains(&bpm) {
        return Ok(false);
    }
    for i in 0..5 {
        if read_u8_at(rom, table - 6 + i)? & 0xFE != 0 {
            return Ok(false);
        }
    }
    if read_u8_at(rom, table - 1)? != 0 {
        return Ok(false);
    }

    let ptr = read_u32_le_at(rom, table)?;
    if !is_rom_pointer(ptr, rom.len()) {
        return Ok(false);
    }
    let pattern = (ptr & ROM_OFFSET_MASK) as usize;
    // First play-order index must be zero, second below 256.
    if read_u8_at(rom, pattern)? != 0 || read_u8_at(rom, pattern + 1)? != 0 {
        return Ok(false);
    }
    if read_u8_at(rom, pattern + 3)? != 0 {
        return Ok(false);
    }
    let rows = if version.is_legacy() {
        read_u8_at(rom, pattern + 32)? as u16
    } else {
        read_u16_le_at(rom, pattern + 32)?
    };
    // Row counts in the wild are always a multiple of eight.
    Ok(rows <= 256 && rows % 8 == 0)
}

/// Sample check: the first up-to-four pointees must look like sample
/// headers (end pointer past the 18-byte header, loop fits, playback rate
/// sane, both flag bytes boolean).
fn check_samples(rom: &[u8], run: &PointerRun) -> Result<bool, ParseError> {
    for i in 0..run.count.min(4) as usize {
        let ptr = read_u32_le_at(rom, run.offset as usize + i * 4)?;
        let addr = (ptr & ROM_OFFSET_MASK) as usize;
        let loop_length = read_u32_le_at(rom, addr)?;
        let end = read_u32_le_at(rom, addr + 4)?;
        if !is_rom_pointer(end, rom.len()) {
            return Ok(false);
        }
        let end_off = (end & ROM_OFFSET_MASK) as usize;
        if end_off <= addr + 18 || loop_length as usize > end_off - addr - 18 {
            return Ok(false);
        }
        if read_u32_le_at(rom, addr + 8)? > 0xFFFF {
            return Ok(false);
        }
        if read_u8_at(rom, addr + 16)? & 0xFE != 0 || read_u8_at(rom, addr + 17)? & 0xFE != 0 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Instrument check: the 96-entry sample map must be small-valued and
/// near-monotonic, and the envelope sustain/loop indices must fit the
/// twelve-node envelopes.
///
/// The last two map entries are exempt from the delta rule; some shipped
/// instruments end with a discontinuity.
fn check_instruments(rom: &[u8], run: &PointerRun) -> Result<bool, ParseError> {
    for n in 0..run.count.min(4) as usize {
        let ptr = read_u32_le_at(rom, run.offset as usize + n * 4)?;
        let addr = (ptr & ROM_OFFSET_MASK) as usize;
        let mut last = 0u16;
        for i in 0..96 {
            let entry = read_u16_le_at(rom, addr + i * 2)?;
            if entry > 256 {
                return Ok(false);
            }
            if i > 0 && i < 94 && (entry as i32 - last as i32).abs() > 16 {
                return Ok(false);
            }
            last = entry;
        }
        // Volume envelope sustain and loop-start node indices.
        if read_u8_at(rom, addr + 241)? > 12 || read_u8_at(rom, addr + 242)? > 12 {
            return Ok(false);
        }
        // Panning envelope, same two fields.
        if read_u8_at(rom, addr + 293)? > 12 || read_u8_at(rom, addr + 294)? > 12 {
            return Ok(false);
        }
    }
    Ok(true)
}
