//! The XM (FastTracker II Extended Module) writer.
//!
//! Serializes one decoded Krawall module, with the sample and instrument
//! lists discovered in the ROM, into a complete XM 1.04 file. Output is
//! assembled in memory; fields that depend on later data (pattern body
//! sizes, the instrument count, sample-offset operands) are written as
//! placeholders at recorded positions and patched in place afterwards.
//!
//! Besides the plain format translation the writer applies three
//! compatibility fix-ups that paper over differences between Krawall's
//! S3M-derived player and FastTracker II:
//!
//! - *sample offset*: Krawall clamps a `9xx` offset past the end of the
//!   sample; FT2 plays garbage. Offsets that overrun the sample are
//!   zeroed once the sample sizes are known.
//! - *portamento underflow*: Krawall stops pitch slides at zero; FT2 wraps
//!   around. Slides that would cross zero are shortened to land there, and
//!   slides that start at zero become a key-off.
//! - *panning memory*: Krawall re-applies the channel pan on every note;
//!   FT2 resets panning to the sample default on instrument retrigger, so
//!   the channel pan is re-asserted explicitly.
use crate::binutil::{push_padded, write_u16};
use crate::effects::{EffectWarning, Translation, WarningSet, XmEffectTranslator, codes, xm_fx};
use crate::error::RipError;
use crate::krawall::{self, Instrument, Sample};
use crate::version::EngineVersion;

/// XM can address at most this many instruments from a pattern.
pub const MAX_INSTRUMENTS: usize = 254;

/// XM note value used for key-off (and for Krawall notes outside 1..=96).
const NOTE_KEY_OFF: u8 = 97;

/// Options controlling XM output.
#[derive(Debug, Clone)]
pub struct XmOptions {
    /// Renumber instruments so only the ones the module actually plays are
    /// written.
    pub trim_instruments: bool,
    /// Apply the playback-compatibility fix-ups.
    pub fix_compatibility: bool,
    /// Module name placed in the file header (at most 20 bytes).
    pub name: Option<String>,
}

impl Default for XmOptions {
    fn default() -> Self {
        XmOptions {
            trim_instruments: true,
            fix_compatibility: true,
            name: None,
        }
    }
}

/// A cell after translation, in XM terms.
#[derive(Debug, Clone, Copy, Default)]
struct XmCell {
    note: Option<u8>,
    instrument: Option<u8>,
    volume: Option<u8>,
    effect: Option<(u8, u8)>,
}

/// Append-only dedup table mapping ROM instrument numbers to 1-based XM
/// instrument numbers.
struct InstrumentTable {
    enabled: bool,
    order: Vec<u16>,
}

impl InstrumentTable {
    fn new(enabled: bool) -> Self {
        InstrumentTable {
            enabled,
            order: Vec::new(),
        }
    }

    fn remap(&mut self, instrument: u16) -> Result<u8, RipError> {
        if !self.enabled || instrument == 0 {
            return Ok(instrument as u8);
        }
        let slot = match self.order.iter().position(|&i| i == instrument) {
            Some(pos) => pos,
            None => {
                self.order.push(instrument);
                self.order.len() - 1
            }
        };
        if slot >= MAX_INSTRUMENTS {
            return Err(RipError::InstrumentLimitExceeded {
                needed: self.order.len(),
            });
        }
        Ok((slot + 1) as u8)
    }
}

/// A recorded `9xx` effect awaiting validation against its sample's size.
struct OffsetFixup {
    /// ROM instrument number (1-based) sounding on the channel.
    instrument: u16,
    op: u8,
    /// Buffer position of the effect byte.
    position: usize,
}

/// Per-channel state for the portamento-underflow fix-up. Pitch position is
/// tracked as `note × 16`.
struct PortaTracker {
    position: Vec<i32>,
    last_op: Vec<u8>,
    speed: i32,
}

impl PortaTracker {
    fn new(channels: usize, init_speed: u8) -> Self {
        PortaTracker {
            position: vec![0; channels],
            last_op: vec![0; channels],
            speed: init_speed.max(1) as i32,
        }
    }

    /// Returns the slide delta for a porta effect, negative for downward
    /// slides, or `None` for non-porta effects.
    fn delta(&mut self, channel: usize, fx: u8, op: u8) -> Option<i32> {
        match fx {
            xm_fx::PORTA_UP | xm_fx::PORTA_DOWN => {
                let op = if op != 0 {
                    self.last_op[channel] = op;
                    op
                } else {
                    self.last_op[channel]
                };
                let d = op as i32 * self.speed;
                Some(if fx == xm_fx::PORTA_UP { d } else { -d })
            }
            xm_fx::EXTENDED if op & 0xF0 == 0x10 => Some((op & 0x0F) as i32),
            xm_fx::EXTENDED if op & 0xF0 == 0x20 => Some(-((op & 0x0F) as i32)),
            xm_fx::EXTRA_FINE if op & 0xF0 == 0x10 => Some(((op & 0x0F) >> 2) as i32),
            xm_fx::EXTRA_FINE if op & 0xF0 == 0x20 => Some(-(((op & 0x0F) >> 2) as i32)),
            _ => None,
        }
    }

    /// Operand that makes a downward slide stop exactly at zero, when one
    /// exists. A normal slide moves `op × speed` units per row, so it can
    /// only land on zero when the position divides evenly; the fine and
    /// extra-fine commands move whole units and always can.
    fn landing_op(&self, fx: u8, position: i32) -> Option<u8> {
        match fx {
            xm_fx::PORTA_DOWN if position % self.speed == 0 => {
                Some((position / self.speed).clamp(1, 0xFF) as u8)
            }
            xm_fx::PORTA_DOWN => None,
            xm_fx::EXTENDED => Some(0x20 | position.clamp(1, 0xF) as u8),
            xm_fx::EXTRA_FINE => Some(0x20 | (position << 2).clamp(1, 0xF) as u8),
            _ => None,
        }
    }
}

/// Serialize the module at `module_offset` as a complete XM file.
pub fn write_module(
    rom: &[u8],
    module_offset: u32,
    sample_offsets: &[u32],
    instrument_offsets: &[u32],
    version: EngineVersion,
    opts: &XmOptions,
) -> Result<Vec<u8>, RipError> {
    let module = krawall::read_module(rom, module_offset as usize, version)?;
    if !opts.trim_instruments && instrument_offsets.len() > MAX_INSTRUMENTS {
        return Err(RipError::InstrumentLimitExceeded {
            needed: instrument_offsets.len(),
        });
    }

    let channels = module.channels as usize;
    let mut out = Vec::new();

    // 60-byte ID text, then format version and header size.
    out.extend_from_slice(b"Extended Module: ");
    let name = opts.name.as_deref().unwrap_or("Krawall conversion");
    push_padded(&mut out, name.as_bytes(), 20, b' ');
    out.push(0x1A);
    push_padded(&mut out, b"UnkrawerterGBA", 20, b' ');
    out.extend_from_slice(&[0x04, 0x01]);
    out.extend_from_slice(&276u32.to_le_bytes());

    out.extend_from_slice(&(module.orders.len() as u16).to_le_bytes());
    out.extend_from_slice(&(module.song_restart as u16).to_le_bytes());
    out.extend_from_slice(&(module.channels as u16).to_le_bytes());
    out.extend_from_slice(&(module.patterns.len() as u16).to_le_bytes());
    let instrument_count_pos = out.len();
    out.extend_from_slice(&(instrument_offsets.len() as u16).to_le_bytes());
    out.extend_from_slice(&(module.linear_slides as u16).to_le_bytes());
    out.extend_from_slice(&(module.init_speed as u16).to_le_bytes());
    out.extend_from_slice(&(module.init_bpm as u16).to_le_bytes());
    push_padded(&mut out, &module.orders, 256, 0);

    let mut translator = XmEffectTranslator::new(channels);
    let mut warnings = WarningSet::new();
    let mut instruments = InstrumentTable::new(opts.trim_instruments);
    let mut offset_fixups: Vec<OffsetFixup> = Vec::new();
    let mut porta = PortaTracker::new(channels, module.init_speed);
    // Running pan per channel, XM units; None when the channel has no
    // explicit pan to re-assert.
    let mut channel_pan: Vec<Option<u8>> = (0..channels)
        .map(|ch| {
            let pan = module.channel_pan[ch];
            (pan >= 0).then(|| ((pan as u16) << 1).min(0xFF) as u8)
        })
        .collect();
    let mut last_instrument: Vec<u16> = vec![0; channels];

    for (pattern_index, pattern) in module.patterns.iter().enumerate() {
        warnings.reset();
        out.extend_from_slice(&9u32.to_le_bytes());
        out.push(0); // packing type
        out.extend_from_slice(&pattern.rows.to_le_bytes());
        let body_size_pos = out.len();
        out.extend_from_slice(&0u16.to_le_bytes());

        for row in &pattern.cells {
            let mut cells: Vec<Option<XmCell>> = vec![None; channels];
            // ROM instrument numbers per emitted cell, for the fix-ups.
            let mut rom_instruments: Vec<u16> = vec![0; channels];

            for cell in row {
                let ch = cell.channel as usize;
                let mut xm = XmCell::default();
                if let Some(event) = cell.note {
                    xm.note = Some(if event.note == 0 || event.note > NOTE_KEY_OFF {
                        NOTE_KEY_OFF
                    } else {
                        event.note
                    });
                    xm.instrument = Some(instruments.remap(event.instrument)?);
                    rom_instruments[ch] = event.instrument;
                }
                xm.volume = cell.volume;
                if let Some(fx) = cell.effect {
                    // Speed changes feed the portamento tracker.
                    if matches!(fx.effect, codes::SPEED | codes::SPEED_BPM)
                        && fx.op > 0
                        && fx.op < 0x20
                    {
                        porta.speed = fx.op as i32;
                    }
                    let translated =
                        translator.translate(ch, fx.effect, fx.op, xm.volume.is_none());
                    apply_translation(&mut xm, translated, &mut warnings, pattern_index);
                }
                cells[ch] = Some(xm);
            }

            for ch in 0..channels {
                let Some(cell) = &mut cells[ch] else { continue };

                if opts.fix_compatibility && !module.amiga_limits {
                    fix_porta_underflow(cell, ch, &mut porta);
                }
                if opts.fix_compatibility && !module.instrument_based {
                    fix_pan_memory(
                        cell,
                        ch,
                        &mut channel_pan,
                        &mut last_instrument,
                        rom_instruments[ch],
                        &mut warnings,
                        pattern_index,
                    );
                }
                if cell.instrument.is_some() && rom_instruments[ch] != 0 {
                    last_instrument[ch] = rom_instruments[ch];
                }
            }

            // Flush the row in channel order.
            for ch in 0..channels {
                match &cells[ch] {
                    None => out.push(0x80),
                    Some(cell) => {
                        let mut flags = 0x80u8;
                        if cell.note.is_some() {
                            flags |= 0x01;
                        }
                        if cell.instrument.is_some() {
                            flags |= 0x02;
                        }
                        if cell.volume.is_some() {
                            flags |= 0x04;
                        }
                        if cell.effect.is_some() {
                            flags |= 0x18;
                        }
                        out.push(flags);
                        if let Some(n) = cell.note {
                            out.push(n);
                        }
                        if let Some(i) = cell.instrument {
                            out.push(i);
                        }
                        if let Some(v) = cell.volume {
                            out.push(v);
                        }
                        if let Some((fx, op)) = cell.effect {
                            if fx == xm_fx::OFFSET && op != 0 {
                                offset_fixups.push(OffsetFixup {
                                    instrument: last_instrument[ch],
                                    op,
                                    position: out.len(),
                                });
                            }
                            out.push(fx);
                            out.push(op);
                        }
                    }
                }
            }
        }

        let body_size = out.len() - body_size_pos - 2;
        write_u16(&mut out, body_size_pos, body_size as u16);
    }

    // Instrument numbers to emit, 1-based into `instrument_offsets`.
    let emitted: Vec<u16> = if opts.trim_instruments {
        instruments.order.clone()
    } else {
        (1..=instrument_offsets.len() as u16).collect()
    };
    write_u16(&mut out, instrument_count_pos, emitted.len() as u16);

    for (index, &rom_instrument) in emitted.iter().enumerate() {
        let record = instrument_offsets
            .get(rom_instrument as usize - 1)
            .map(|&off| krawall::read_instrument(rom, off as usize))
            .transpose()?;
        write_instrument(
            &mut out,
            rom,
            index,
            record,
            rom_instrument,
            sample_offsets,
            &offset_fixups,
        )?;
    }

    Ok(out)
}

fn apply_translation(
    cell: &mut XmCell,
    translated: Translation,
    warnings: &mut WarningSet,
    pattern_index: usize,
) {
    cell.effect = translated.effect;
    if let Some(vol) = translated.volume
        && cell.volume.is_none()
    {
        cell.volume = Some(vol);
    }
    if let Some(w) = translated.warning {
        warnings.warn(w, pattern_index);
    }
}

/// Keep a channel's pitch slides from running past note zero.
fn fix_porta_underflow(cell: &mut XmCell, channel: usize, porta: &mut PortaTracker) {
    if let Some(note) = cell.note
        && (1..NOTE_KEY_OFF).contains(&note)
    {
        porta.position[channel] = (note as i32) << 4;
    }
    let Some((fx, op)) = cell.effect else { return };
    let Some(delta) = porta.delta(channel, fx, op) else {
        return;
    };
    let position = porta.position[channel];
    let landing = position + delta;
    if landing >= 0 {
        porta.position[channel] = landing;
        return;
    }
    if position > 0
        && let Some(op) = porta.landing_op(fx, position)
    {
        // One last, shortened slide down to zero.
        cell.effect = Some((fx, op));
    } else {
        // Already at the floor, or no operand lands exactly on zero: the
        // slide can only wrap, cut the note off.
        *cell = XmCell {
            note: Some(NOTE_KEY_OFF),
            ..XmCell::default()
        };
    }
    porta.position[channel] = 0;
}

/// Re-assert the channel pan when an instrument retrigger would reset it.
fn fix_pan_memory(
    cell: &mut XmCell,
    channel: usize,
    channel_pan: &mut [Option<u8>],
    last_instrument: &mut [u16],
    rom_instrument: u16,
    warnings: &mut WarningSet,
    pattern_index: usize,
) {
    // Explicit pans become the channel's running pan.
    match cell.effect {
        Some((fx, op)) if fx == xm_fx::PAN => {
            channel_pan[channel] = Some(op);
            return;
        }
        Some((fx, op)) if fx == xm_fx::EXTENDED && op & 0xF0 == 0x80 => {
            channel_pan[channel] = Some((op & 0x0F) * 0x11);
            return;
        }
        _ => {}
    }
    if let Some(vol) = cell.volume
        && (0xC0..=0xCF).contains(&vol)
    {
        channel_pan[channel] = Some((vol & 0x0F) * 0x11);
        return;
    }

    // Only real instrument retriggers lose the pan; a bare note keeps it.
    if cell.instrument.is_none() || rom_instrument == 0 {
        return;
    }
    let Some(pan) = channel_pan[channel] else {
        return;
    };
    if cell.effect.is_none() {
        cell.effect = Some((xm_fx::PAN, pan));
    } else if rom_instrument == last_instrument[channel] {
        // Same instrument again: the retrigger is redundant, dropping it
        // keeps FT2's pan memory intact.
        cell.instrument = None;
    } else if cell.volume.is_none() {
        cell.volume = Some(0xC0 | (pan >> 4));
    } else {
        warnings.warn(EffectWarning::PanLost, pattern_index);
    }
}

/// Write one XM instrument: header, sample headers, then all sample bodies.
fn write_instrument(
    out: &mut Vec<u8>,
    rom: &[u8],
    index: usize,
    record: Option<Instrument>,
    rom_instrument: u16,
    sample_offsets: &[u32],
    offset_fixups: &[OffsetFixup],
) -> Result<(), RipError> {
    // Unique sample list in first-appearance order. The map is close to
    // monotonic, so consecutive dedup is exact in practice.
    let mut unique: Vec<u16> = Vec::new();
    let mut map = [0u8; 96];
    if let Some(instrument) = &record {
        let mut entries: Vec<u16> = instrument.samples.to_vec();
        entries.dedup();
        unique = entries
            .into_iter()
            .filter(|&e| (e as usize) < sample_offsets.len())
            .collect();
        for (i, &entry) in instrument.samples.iter().enumerate() {
            // XM note maps are 0-based into the instrument's own samples.
            map[i] = unique.iter().position(|&u| u == entry).unwrap_or(0) as u8;
        }
    }

    let sample_count = unique.len() as u16;
    let header_size: u32 = if sample_count == 0 { 29 } else { 252 };
    out.extend_from_slice(&header_size.to_le_bytes());
    push_padded(out, format!("Instrument{}", index).as_bytes(), 22, 0);
    out.push(0); // instrument type
    out.extend_from_slice(&sample_count.to_le_bytes());
    let Some(instrument) = record else {
        return Ok(());
    };
    if sample_count == 0 {
        return Ok(());
    }

    out.extend_from_slice(&40u32.to_le_bytes()); // sample header size
    out.extend_from_slice(&map);
    for env in [&instrument.env_vol, &instrument.env_pan] {
        for node in &env.nodes {
            out.extend_from_slice(&node.x().to_le_bytes());
            out.extend_from_slice(&node.y().to_le_bytes());
        }
    }
    out.push(instrument.env_vol.max);
    out.push(instrument.env_pan.max);
    out.push(instrument.env_vol.sus);
    out.push(instrument.env_vol.loop_start);
    out.push(instrument.env_vol.max); // loop end: the last used node
    out.push(instrument.env_pan.sus);
    out.push(instrument.env_pan.loop_start);
    out.push(instrument.env_pan.max);
    out.push(instrument.env_vol.flags);
    out.push(instrument.env_pan.flags);
    out.push(instrument.vib_type);
    out.push(instrument.vib_sweep);
    out.push(instrument.vib_depth);
    out.push(instrument.vib_rate);
    out.extend_from_slice(&instrument.vol_fade.to_le_bytes());
    out.resize(out.len() + 11, 0);

    let mut samples: Vec<Sample> = Vec::with_capacity(unique.len());
    for (j, &entry) in unique.iter().enumerate() {
        let sample = krawall::read_sample(rom, sample_offsets[entry as usize] as usize)?;
        out.extend_from_slice(&sample.size.to_le_bytes());
        let loop_start = if sample.loop_length == 0 {
            0
        } else {
            sample.size.saturating_sub(loop_bytes(&sample))
        };
        out.extend_from_slice(&loop_start.to_le_bytes());
        out.extend_from_slice(&loop_bytes(&sample).to_le_bytes());
        out.push(sample.vol_default);
        out.push(sample.fine_tune as u8);
        out.push((sample.looped as u8) | if sample.hq { 0x10 } else { 0 });
        out.push((sample.pan_default as u8).wrapping_add(0x80));
        out.push(sample.relative_note as u8);
        out.push(0);
        push_padded(out, format!("Sample{}", j).as_bytes(), 22, 0);

        if j == 0 {
            zero_overrunning_offsets(out, offset_fixups, rom_instrument, sample.size);
        }
        samples.push(sample);
    }

    for sample in &samples {
        if sample.hq {
            let mut previous: i16 = 0;
            for chunk in sample.data.chunks_exact(2) {
                let value = i16::from_le_bytes([chunk[0], chunk[1]]);
                out.extend_from_slice(&value.wrapping_sub(previous).to_le_bytes());
                previous = value;
            }
        } else {
            let mut previous: u8 = 0;
            for &byte in &sample.data {
                let value = byte.wrapping_add(0x80);
                out.push(value.wrapping_sub(previous));
                previous = value;
            }
        }
    }

    Ok(())
}

/// Loop length in bytes (the record stores frames).
fn loop_bytes(sample: &Sample) -> u32 {
    if sample.hq {
        sample.loop_length * 2
    } else {
        sample.loop_length
    }
}

/// Patch every recorded `9xx` whose target lies past the end of the
/// instrument's sample back to an empty effect.
fn zero_overrunning_offsets(
    out: &mut [u8],
    fixups: &[OffsetFixup],
    rom_instrument: u16,
    sample_size: u32,
) {
    for fixup in fixups {
        if fixup.instrument == rom_instrument && (fixup.op as u32) << 8 > sample_size {
            out[fixup.position] = 0;
            out[fixup.position + 1] = 0;
        }
    }
}
