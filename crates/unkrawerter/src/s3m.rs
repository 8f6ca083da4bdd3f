//! The S3M (Scream Tracker 3) writer.
//!
//! S3M output only makes sense for the modules Krawall imported from S3M
//! in the first place: sample-based playback and 64-row patterns. Anything
//! else is refused with [`RipError::UnsupportedTargetFormat`] so the caller
//! can fall back to XM.
//!
//! Every block behind the header (sample headers, packed patterns, sample
//! data) is addressed by a parapointer, its file offset divided by 16,
//! so blocks are padded to 16-byte boundaries and each parapointer is
//! patched once its block's position is known. Krawall's packed pattern
//! stream is structurally identical to S3M's, so pattern bodies need only
//! three semantic rewrites: the note byte becomes octave/semitone nibbles,
//! the XM-convention volume column is clamped to S3M's range, and effects
//! go through the translation table.
use crate::binutil::{push_padded, write_u16};
use crate::effects::{EffectWarning, WarningSet, translate_s3m};
use crate::error::RipError;
use crate::krawall::{self, Cell, Sample};
use crate::version::EngineVersion;

/// Pattern instrument bytes can address at most this many samples.
pub const MAX_SAMPLES: usize = 255;

/// S3M patterns are always this many rows.
const PATTERN_ROWS: u16 = 64;

/// Note byte for key-off.
const NOTE_OFF: u8 = 254;

/// Options controlling S3M output.
#[derive(Debug, Clone)]
pub struct S3mOptions {
    /// Renumber samples so only the ones the module actually plays are
    /// written.
    pub trim_instruments: bool,
    /// Module title placed in the file header (at most 28 bytes).
    pub name: Option<String>,
}

impl Default for S3mOptions {
    fn default() -> Self {
        S3mOptions {
            trim_instruments: true,
            name: None,
        }
    }
}

/// Serialize the module at `module_offset` as a complete S3M file.
///
/// The module's pattern "instrument" column indexes the sample list
/// directly (Krawall keeps S3M numbering when it imports), which is why no
/// instrument table is involved.
pub fn write_module(
    rom: &[u8],
    module_offset: u32,
    sample_offsets: &[u32],
    version: EngineVersion,
    opts: &S3mOptions,
) -> Result<Vec<u8>, RipError> {
    let module = krawall::read_module(rom, module_offset as usize, version)?;
    if module.instrument_based {
        return Err(RipError::UnsupportedTargetFormat(
            "instrument-based modules cannot be written as S3M".into(),
        ));
    }
    for (i, pattern) in module.patterns.iter().enumerate() {
        if pattern.rows != PATTERN_ROWS {
            return Err(RipError::UnsupportedTargetFormat(format!(
                "pattern {} has {} rows, S3M requires 64",
                i, pattern.rows
            )));
        }
    }

    // Sample numbers the module plays, in first-use order (or the whole
    // list when not trimming). Pattern bytes hold 1-based numbers.
    let used: Vec<u16> = if opts.trim_instruments {
        let mut used = Vec::new();
        for pattern in &module.patterns {
            for cell in pattern.cells.iter().flatten() {
                if let Some(event) = cell.note
                    && event.instrument != 0
                    && !used.contains(&event.instrument)
                {
                    used.push(event.instrument);
                }
            }
        }
        used
    } else {
        (1..=sample_offsets.len() as u16).collect()
    };
    if used.len() > MAX_SAMPLES {
        return Err(RipError::InstrumentLimitExceeded { needed: used.len() });
    }

    let mut out = Vec::new();
    let title = opts.name.as_deref().unwrap_or("Krawall conversion");
    push_padded(&mut out, title.as_bytes(), 28, 0);
    out.push(0x1A);
    out.push(16); // file type: module
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(module.orders.len() as u16).to_le_bytes());
    out.extend_from_slice(&(used.len() as u16).to_le_bytes());
    out.extend_from_slice(&(module.patterns.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0x2013u16.to_le_bytes()); // tracker version
    out.extend_from_slice(&2u16.to_le_bytes()); // sample format: unsigned
    out.extend_from_slice(b"SCRM");
    out.push(module.vol_global);
    out.push(module.init_speed);
    out.push(module.init_bpm);
    out.push(64); // master volume
    out.push(0); // ultra-click removal
    out.push(0xFC); // default pan positions present
    out.resize(out.len() + 8, 0);
    out.extend_from_slice(&0u16.to_le_bytes()); // special pointer

    let channels = module.channels as usize;
    for i in 0..32 {
        out.push(if i >= channels {
            0xFF
        } else if i < channels / 2 {
            i as u8 // left speaker slots
        } else {
            i as u8 | 8 // right speaker slots
        });
    }

    out.extend_from_slice(&module.orders);

    let instrument_pointer_pos = out.len();
    out.resize(out.len() + used.len() * 2, 0);
    let pattern_pointer_pos = out.len();
    out.resize(out.len() + module.patterns.len() * 2, 0);

    // Default pan positions (enabled by the 0xFC byte above).
    for i in 0..32 {
        if i < channels {
            out.push(0x20 | ((module.channel_pan[i].max(0) as u8 >> 3) & 0x0F));
        } else {
            out.push(0);
        }
    }

    // Sample headers, 80 bytes each; memseg parapointers patched when the
    // sample data is written.
    let mut samples: Vec<Sample> = Vec::with_capacity(used.len());
    let mut memseg_positions: Vec<usize> = Vec::with_capacity(used.len());
    for (i, &number) in used.iter().enumerate() {
        let sample = sample_offsets
            .get(number as usize - 1)
            .map(|&off| krawall::read_sample(rom, off as usize))
            .transpose()?
            .unwrap_or_default();
        let para = align_block(&mut out)?;
        write_u16(&mut out, instrument_pointer_pos + i * 2, para as u16);
        memseg_positions.push(out.len() + 13);
        write_sample_header(&mut out, i, &sample);
        samples.push(sample);
    }

    // Packed patterns.
    let mut warnings = WarningSet::new();
    for (pattern_index, pattern) in module.patterns.iter().enumerate() {
        warnings.reset();
        let para = align_block(&mut out)?;
        write_u16(&mut out, pattern_pointer_pos + pattern_index * 2, para as u16);
        let length_pos = out.len();
        out.extend_from_slice(&0u16.to_le_bytes());
        for row in &pattern.cells {
            for cell in row {
                write_cell(&mut out, cell, &used, opts, &mut warnings, pattern_index);
            }
            out.push(0);
        }
        let length = out.len() - length_pos;
        write_u16(&mut out, length_pos, length as u16);
    }

    // Sample data: unsigned PCM.
    for (i, sample) in samples.iter().enumerate() {
        let para = align_block(&mut out)?;
        let pos = memseg_positions[i];
        out[pos] = (para >> 16) as u8;
        write_u16(&mut out, pos + 1, para as u16);
        if sample.hq {
            for chunk in sample.data.chunks_exact(2) {
                let value = i16::from_le_bytes([chunk[0], chunk[1]]);
                out.extend_from_slice(&(value as u16 ^ 0x8000).to_le_bytes());
            }
        } else {
            for &byte in &sample.data {
                out.push(byte.wrapping_add(0x80));
            }
        }
    }

    Ok(out)
}

/// Pad to the next 16-byte boundary and return the block's parapointer.
fn align_block(out: &mut Vec<u8>) -> Result<usize, RipError> {
    while out.len() % 16 != 0 {
        out.push(0);
    }
    let para = out.len() / 16;
    if para > usize::from(u16::MAX) {
        return Err(RipError::UnsupportedTargetFormat(
            "output too large for S3M parapointers".into(),
        ));
    }
    Ok(para)
}

/// The 80-byte S3M sample header (`memseg` is patched later).
fn write_sample_header(out: &mut Vec<u8>, index: usize, sample: &Sample) {
    out.push(1); // type: sample
    out.resize(out.len() + 12, 0); // DOS filename
    out.resize(out.len() + 3, 0); // memseg parapointer
    let frames = sample.frame_count();
    out.extend_from_slice(&frames.to_le_bytes());
    let loop_begin = if sample.loop_length == 0 {
        0
    } else {
        frames.saturating_sub(sample.loop_length)
    };
    out.extend_from_slice(&loop_begin.to_le_bytes());
    out.extend_from_slice(&frames.to_le_bytes()); // loop end
    out.push(sample.vol_default);
    out.push(0);
    out.push(0); // packing: none
    out.push((sample.looped as u8) | if sample.hq { 4 } else { 0 });
    out.extend_from_slice(&sample.c2_freq.to_le_bytes());
    out.resize(out.len() + 12, 0);
    push_padded(out, format!("Sample{}", index).as_bytes(), 28, 0);
    out.extend_from_slice(b"SCRS");
}

/// Emit one pattern cell with the three semantic rewrites.
fn write_cell(
    out: &mut Vec<u8>,
    cell: &Cell,
    used: &[u16],
    opts: &S3mOptions,
    warnings: &mut WarningSet,
    pattern_index: usize,
) {
    let note_pair = cell.note.map(|event| {
        let note = if event.note == 0 || event.note > 96 {
            NOTE_OFF
        } else {
            ((event.note - 1) / 12) << 4 | ((event.note - 1) % 12)
        };
        let instrument = if event.instrument == 0 {
            0
        } else if opts.trim_instruments {
            used.iter()
                .position(|&u| u == event.instrument)
                .map(|p| p as u8 + 1)
                .unwrap_or(0)
        } else {
            event.instrument as u8
        };
        (note, instrument)
    });

    // Volume column: XM convention in, S3M range out. Pan values may move
    // into the effect slot below.
    let mut volume: Option<u8> = None;
    let mut volume_pan: Option<u8> = None;
    if let Some(v) = cell.volume {
        match v {
            0x00..=0x0F => volume = Some(0xFF),
            0x10..=0x50 => volume = Some(v - 0x10),
            // Rescaled to the X command's 0..=0x80 range.
            0xC0..=0xCF => volume_pan = Some(((v & 0x0F) as u16 * 0x11 / 2) as u8),
            _ => {
                warnings.warn(EffectWarning::VolumeColumnLost, pattern_index);
            }
        }
    }

    let mut effect: Option<(u8, u8)> = None;
    if let Some(fx) = cell.effect {
        let translated = translate_s3m(fx.effect, fx.op, volume.is_none());
        effect = translated.effect;
        if let Some(v) = translated.volume
            && volume.is_none()
        {
            volume = Some(v);
        }
        if let Some(w) = translated.warning {
            warnings.warn(w, pattern_index);
        }
    }
    if let Some(pan) = volume_pan {
        if effect.is_none() {
            effect = Some((crate::effects::s3m_fx::PAN, pan));
        } else {
            warnings.warn(EffectWarning::PanLost, pattern_index);
        }
    }

    let mut what = cell.channel & 0x1F;
    if note_pair.is_some() {
        what |= 0x20;
    }
    if volume.is_some() {
        what |= 0x40;
    }
    if effect.is_some() {
        what |= 0x80;
    }
    if what & 0xE0 == 0 {
        return; // nothing left in this cell
    }
    out.push(what);
    if let Some((note, instrument)) = note_pair {
        out.push(note);
        out.push(instrument);
    }
    if let Some(v) = volume {
        out.push(v);
    }
    if let Some((fx, op)) = effect {
        out.push(fx);
        out.push(op);
    }
}
