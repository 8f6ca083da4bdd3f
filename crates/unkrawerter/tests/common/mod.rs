//! Shared helper for building synthetic ROM images containing Krawall
//! structures, used by the integration tests.
#![allow(dead_code)]

/// Builds a little-endian ROM image by appending Krawall records and
/// pointer lists, returning the file offset of everything placed.
pub struct RomBuilder {
    bytes: Vec<u8>,
}

/// Everything a module record needs; `..ModuleSpec::default()` covers the
/// usual case.
pub struct ModuleSpec {
    pub channels: u8,
    pub song_restart: u8,
    /// Raw order table, marker bytes included.
    pub orders: Vec<u8>,
    pub channel_pan: [i8; 32],
    pub vol_global: u8,
    pub init_speed: u8,
    pub init_bpm: u8,
    pub instrument_based: bool,
    pub linear_slides: bool,
    pub amiga_limits: bool,
}

impl Default for ModuleSpec {
    fn default() -> Self {
        ModuleSpec {
            channels: 1,
            song_restart: 0,
            orders: vec![0],
            channel_pan: [0; 32],
            vol_global: 64,
            init_speed: 6,
            init_bpm: 125,
            instrument_based: false,
            linear_slides: true,
            amiga_limits: false,
        }
    }
}

pub fn rom_ptr(offset: u32) -> u32 {
    0x0800_0000 | offset
}

impl RomBuilder {
    pub fn new() -> Self {
        RomBuilder { bytes: Vec::new() }
    }

    pub fn pos(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Zero-pad the image out to at least `len` bytes.
    pub fn pad_to(&mut self, len: usize) -> &mut Self {
        if self.bytes.len() < len {
            self.bytes.resize(len, 0);
        }
        self
    }

    pub fn align(&mut self, n: usize) -> &mut Self {
        while self.bytes.len() % n != 0 {
            self.bytes.push(0);
        }
        self
    }

    pub fn gap(&mut self, n: usize) -> &mut Self {
        self.bytes.resize(self.bytes.len() + n, 0);
        self
    }

    pub fn push(&mut self, data: &[u8]) -> u32 {
        let at = self.pos();
        self.bytes.extend_from_slice(data);
        at
    }

    /// Append a sample record; `data` is signed 8-bit PCM.
    pub fn sample(&mut self, data: &[u8], c2_freq: u32, loop_length: u32) -> u32 {
        self.align(4);
        let at = self.pos();
        let end = rom_ptr(at + 18 + data.len() as u32);
        self.bytes.extend_from_slice(&loop_length.to_le_bytes());
        self.bytes.extend_from_slice(&end.to_le_bytes());
        self.bytes.extend_from_slice(&c2_freq.to_le_bytes());
        self.bytes.push(0); // finetune
        self.bytes.push(0); // relative note
        self.bytes.push(64); // default volume
        self.bytes.push(0); // default panning
        self.bytes.push((loop_length > 0) as u8);
        self.bytes.push(0); // hq
        self.bytes.extend_from_slice(data);
        at
    }

    /// Append an instrument record whose whole note map points at one
    /// sample-list entry.
    pub fn instrument(&mut self, sample_index: u16) -> u32 {
        self.align(4);
        let at = self.pos();
        for _ in 0..96 {
            self.bytes.extend_from_slice(&sample_index.to_le_bytes());
        }
        // Two zeroed envelopes, volume fade, auto-vibrato.
        self.gap(52 + 52 + 2 + 4);
        at
    }

    /// Append a pattern with a 16-bit row count (modern layout).
    pub fn pattern(&mut self, rows: u16, stream: &[u8]) -> u32 {
        self.align(4);
        let at = self.pos();
        self.gap(32); // play-order indices
        self.bytes.extend_from_slice(&rows.to_le_bytes());
        self.bytes.extend_from_slice(stream);
        at
    }

    /// Append a pattern with an 8-bit row count (legacy layout).
    pub fn pattern_legacy(&mut self, rows: u8, stream: &[u8]) -> u32 {
        self.align(4);
        let at = self.pos();
        self.gap(32);
        self.bytes.push(rows);
        self.bytes.extend_from_slice(stream);
        at
    }

    /// Append a module record followed by its pattern pointer table.
    /// Returns the module header's offset.
    pub fn module(&mut self, spec: &ModuleSpec, pattern_offsets: &[u32]) -> u32 {
        self.align(4);
        let at = self.pos();
        self.bytes.push(spec.channels);
        self.bytes.push(spec.orders.len() as u8);
        self.bytes.push(spec.song_restart);
        let mut order = [0u8; 256];
        order[..spec.orders.len()].copy_from_slice(&spec.orders);
        self.bytes.extend_from_slice(&order);
        self.bytes
            .extend_from_slice(&spec.channel_pan.map(|p| p as u8));
        self.gap(64); // song index
        self.bytes.push(spec.vol_global);
        self.bytes.push(spec.init_speed);
        self.bytes.push(spec.init_bpm);
        self.bytes.push(spec.instrument_based as u8);
        self.bytes.push(spec.linear_slides as u8);
        self.bytes.push(0); // volume slides flag
        self.bytes.push(0); // volume optimization flag
        self.bytes.push(spec.amiga_limits as u8);
        self.bytes.push(0); // padding
        for &off in pattern_offsets {
            self.bytes.extend_from_slice(&rom_ptr(off).to_le_bytes());
        }
        at
    }

    /// Append a list of ROM pointers to the given file offsets.
    pub fn pointer_list(&mut self, offsets: &[u32]) -> u32 {
        self.align(4);
        let at = self.pos();
        for &off in offsets {
            self.bytes.extend_from_slice(&rom_ptr(off).to_le_bytes());
        }
        at
    }
}

/// Offsets of the structures [`discoverable_rom`] placed.
pub struct DiscoverableRom {
    pub rom: Vec<u8>,
    pub module: u32,
    pub sample_list: u32,
    pub instrument_list: u32,
}

/// Build a ROM image the discovery pipeline can fully locate: four
/// samples, four instruments, one module playing four 64-row patterns,
/// plus the two pointer lists. The classifier's plausibility windows
/// (order count, speed, BPM, row counts) are all satisfied.
pub fn discoverable_rom() -> DiscoverableRom {
    let mut b = RomBuilder::new();
    b.gap(0x200);

    let samples: Vec<u32> = (0..4).map(|_| b.sample(&[0u8; 32], 8363, 0)).collect();
    b.gap(32);
    let instruments: Vec<u32> = (0..4).map(|_| b.instrument(0)).collect();
    b.gap(32);
    let patterns: Vec<u32> = (0..4).map(|_| b.pattern(64, &empty_rows(64))).collect();
    b.gap(32);

    let orders: Vec<u8> = (0..30).map(|i| (i % 4) as u8).collect();
    let module = b.module(
        &ModuleSpec {
            channels: 4,
            orders,
            ..ModuleSpec::default()
        },
        &patterns,
    );
    b.gap(32);
    let sample_list = b.pointer_list(&samples);
    b.gap(32);
    let instrument_list = b.pointer_list(&instruments);
    b.gap(0x100);
    DiscoverableRom {
        rom: b.finish(),
        module,
        sample_list,
        instrument_list,
    }
}

/// Encode one modern-layout pattern cell.
pub fn cell(
    channel: u8,
    note: Option<(u8, u16)>,
    volume: Option<u8>,
    effect: Option<(u8, u8)>,
) -> Vec<u8> {
    let mut follow = channel;
    if note.is_some() {
        follow |= 0x20;
    }
    if volume.is_some() {
        follow |= 0x40;
    }
    if effect.is_some() {
        follow |= 0x80;
    }
    let mut out = vec![follow];
    if let Some((n, instrument)) = note {
        if instrument > 0xFF {
            out.push(n | 0x80);
            out.push(instrument as u8);
            out.push((instrument >> 8) as u8);
        } else {
            out.push(n);
            out.push(instrument as u8);
        }
    }
    if let Some(v) = volume {
        out.push(v);
    }
    if let Some((fx, op)) = effect {
        out.push(fx);
        out.push(op);
    }
    out
}

/// Concatenate cells into one row, with its terminator.
pub fn row(cells: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = cells.concat();
    out.push(0);
    out
}

/// Rows of empty cells.
pub fn empty_rows(n: usize) -> Vec<u8> {
    vec![0; n]
}
