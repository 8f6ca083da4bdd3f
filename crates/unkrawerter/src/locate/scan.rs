//! The pointer-run scanner.
use crate::binutil::{ROM_OFFSET_MASK, is_rom_pointer, read_u32_le_at};

/// Minimum run length that is worth classifying.
pub const DEFAULT_THRESHOLD: u32 = 4;

/// Runs at least this long are data (graphics tiles, maps), not pointer
/// tables; Krawall never stores more than a few hundred entries.
const RUN_LIMIT: u32 = 1024;

/// Structures the pointers refer to are at least this far apart; anything
/// tighter is an array of small records, not a Krawall table.
const MIN_POINTEE_SPACING: i32 = 0x10;

/// A run of consecutive pointer-like dwords: file offset of the first entry
/// plus the entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerRun {
    pub offset: u32,
    pub count: u32,
}

/// The scanner's per-dword predicate: a well-formed ROM pointer that is not
/// one of the two known false-positive shapes.
pub fn accepts_pointer(word: u32, rom_len: usize) -> bool {
    if !is_rom_pointer(word, rom_len) {
        return false;
    }
    // 0x08080808 is a common fill/data pattern.
    if word == 0x0808_0808 {
        return false;
    }
    // Two interleaved 16-bit values of the form 0x08xx with a small stride
    // look exactly like a pointer but are a packed array.
    let hi = (word >> 16) as u16;
    let lo = word as u16;
    if (word & 0x00FF_00FF) == 0x0008_0008 && (hi as i32 - lo as i32) < 4 {
        return false;
    }
    true
}

/// Walk the image in 4-byte steps and collect pointer runs.
///
/// A run is emitted when it ends with a length in `[threshold, 1024)`. Runs
/// whose first entries point at addresses less than 16 bytes apart are
/// dropped: real Krawall records are never that tightly packed.
pub fn scan_pointer_runs(rom: &[u8], threshold: u32) -> Vec<PointerRun> {
    let mut runs = Vec::new();
    let mut start = 0u32;
    let mut count = 0u32;

    let flush = |start: u32, count: u32, runs: &mut Vec<PointerRun>| {
        if count >= threshold && count < RUN_LIMIT {
            runs.push(PointerRun {
                offset: start,
                count,
            });
        }
    };

    for (i, chunk) in rom.chunks_exact(4).enumerate() {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        if accepts_pointer(word, rom.len()) {
            if count == 0 {
                start = (i * 4) as u32;
            }
            count += 1;
        } else {
            flush(start, count, &mut runs);
            count = 0;
        }
    }
    flush(start, count, &mut runs);

    runs.retain(|run| !pointees_too_close(rom, run));
    runs
}

/// Check the first up-to-four entries of a run for tight pointee spacing.
fn pointees_too_close(rom: &[u8], run: &PointerRun) -> bool {
    let take = run.count.min(4) as usize;
    let mut prev: Option<i32> = None;
    for i in 0..take {
        let Ok(word) = read_u32_le_at(rom, run.offset as usize + i * 4) else {
            return true;
        };
        let addr = (word & ROM_OFFSET_MASK) as i32;
        if let Some(prev) = prev
            && addr - prev < MIN_POINTEE_SPACING
        {
            return true;
        }
        prev = Some(addr);
    }
    false
}
