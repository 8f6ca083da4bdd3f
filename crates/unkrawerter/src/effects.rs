//! Krawall effect codes and their translation to XM and S3M.
//!
//! Krawall's converter imported modules from both XM and S3M, so its effect
//! code space (0..=50) is the union of both command sets; un-converting
//! means mapping every code back to whichever command the target format
//! has, and compensating where the semantics do not line up:
//!
//! - S3M-style commands carry operand "memory" (an operand of zero repeats
//!   the last non-zero one); XM has per-command memory with different
//!   rules, so the translator resolves the memory itself and emits the
//!   effective operand.
//! - S3M volume slides encode fine slides in an operand nibble; XM splits
//!   those across the extended command and the volume column.
//! - A handful of codes (channel volume, fine vibrato, marks) have no XM
//!   equivalent at all and are dropped with a warning, at most once per
//!   pattern.
//!
//! The mapping itself is two 51-entry tables; the handful of codes that
//! need operand-dependent branching are special-cased in the translators.

/// Krawall effect codes.
pub mod codes {
    pub const NONE: u8 = 0;
    pub const SPEED: u8 = 1;
    pub const BPM: u8 = 2;
    pub const SPEED_BPM: u8 = 3;
    pub const PATTERN_JUMP: u8 = 4;
    pub const PATTERN_BREAK: u8 = 5;
    pub const VOLSLIDE_S3M: u8 = 6;
    pub const VOLSLIDE_XM: u8 = 7;
    pub const FINE_VOLSLIDE_DOWN: u8 = 8;
    pub const FINE_VOLSLIDE_UP: u8 = 9;
    pub const PORTA_DOWN_XM: u8 = 10;
    pub const PORTA_DOWN_S3M: u8 = 11;
    pub const FINE_PORTA_DOWN: u8 = 12;
    pub const EXTRA_FINE_PORTA_DOWN: u8 = 13;
    pub const PORTA_UP_XM: u8 = 14;
    pub const PORTA_UP_S3M: u8 = 15;
    pub const FINE_PORTA_UP: u8 = 16;
    pub const EXTRA_FINE_PORTA_UP: u8 = 17;
    pub const SET_VOLUME: u8 = 18;
    pub const PORTA_NOTE: u8 = 19;
    pub const VIBRATO: u8 = 20;
    pub const TREMOR: u8 = 21;
    pub const ARPEGGIO: u8 = 22;
    pub const VOLSLIDE_VIBRATO: u8 = 23;
    pub const VOLSLIDE_PORTA: u8 = 24;
    pub const CHANNEL_VOLUME: u8 = 25;
    pub const CHANNEL_VOLSLIDE: u8 = 26;
    pub const SAMPLE_OFFSET: u8 = 27;
    pub const PAN_SLIDE: u8 = 28;
    pub const RETRIG: u8 = 29;
    pub const TREMOLO: u8 = 30;
    pub const FINE_VIBRATO: u8 = 31;
    pub const GLOBAL_VOLUME: u8 = 32;
    pub const GLOBAL_VOLSLIDE: u8 = 33;
    pub const SET_PAN: u8 = 34;
    pub const PANBRELLO: u8 = 35;
    pub const MARK: u8 = 36;
    pub const GLISSANDO: u8 = 37;
    pub const VIBRATO_WAVEFORM: u8 = 38;
    pub const TREMOLO_WAVEFORM: u8 = 39;
    pub const PANBRELLO_WAVEFORM: u8 = 40;
    pub const PATTERN_DELAY: u8 = 41;
    pub const OLD_PAN: u8 = 42;
    pub const PAN_16: u8 = 43;
    pub const NOTE_CUT: u8 = 44;
    pub const NOTE_DELAY: u8 = 45;
    pub const ENVELOPE_POS: u8 = 46;
    pub const OFFSET_HIGH: u8 = 47;
    pub const GLOBAL_VOLSLIDE_XM: u8 = 48;
    pub const KEY_OFF: u8 = 49;
    pub const SET_FINETUNE: u8 = 50;
}

/// Number of Krawall effect codes.
pub const EFFECT_COUNT: usize = 51;

/// XM effect command numbers (`0x0..=0xF` are the digit commands, letters
/// continue from `G = 0x10`).
pub mod xm_fx {
    pub const ARPEGGIO: u8 = 0x00;
    pub const PORTA_UP: u8 = 0x01;
    pub const PORTA_DOWN: u8 = 0x02;
    pub const PORTA_NOTE: u8 = 0x03;
    pub const VIBRATO: u8 = 0x04;
    pub const PORTA_VOLSLIDE: u8 = 0x05;
    pub const VIBRATO_VOLSLIDE: u8 = 0x06;
    pub const TREMOLO: u8 = 0x07;
    pub const PAN: u8 = 0x08;
    pub const OFFSET: u8 = 0x09;
    pub const VOLSLIDE: u8 = 0x0A;
    pub const JUMP: u8 = 0x0B;
    pub const VOLUME: u8 = 0x0C;
    pub const BREAK: u8 = 0x0D;
    pub const EXTENDED: u8 = 0x0E;
    pub const SPEED: u8 = 0x0F;
    pub const GLOBAL_VOLUME: u8 = 0x10; // G
    pub const GLOBAL_VOLSLIDE: u8 = 0x11; // H
    pub const KEY_OFF: u8 = 0x14; // K
    pub const ENVELOPE_POS: u8 = 0x15; // L
    pub const PAN_SLIDE: u8 = 0x19; // P
    pub const RETRIG: u8 = 0x1B; // R
    pub const TREMOR: u8 = 0x1D; // T
    pub const EXTRA_FINE: u8 = 0x21; // X
    pub const PANBRELLO: u8 = 0x22; // Y (OpenMPT extension)
}

/// S3M effect command numbers (1-based letters, `A = 1`).
pub mod s3m_fx {
    pub const SPEED: u8 = 1; // A
    pub const JUMP: u8 = 2; // B
    pub const BREAK: u8 = 3; // C
    pub const VOLSLIDE: u8 = 4; // D
    pub const PORTA_DOWN: u8 = 5; // E
    pub const PORTA_UP: u8 = 6; // F
    pub const PORTA_NOTE: u8 = 7; // G
    pub const VIBRATO: u8 = 8; // H
    pub const TREMOR: u8 = 9; // I
    pub const ARPEGGIO: u8 = 10; // J
    pub const VIBRATO_VOLSLIDE: u8 = 11; // K
    pub const PORTA_VOLSLIDE: u8 = 12; // L
    pub const CHANNEL_VOLUME: u8 = 13; // M
    pub const CHANNEL_VOLSLIDE: u8 = 14; // N
    pub const OFFSET: u8 = 15; // O
    pub const PAN_SLIDE: u8 = 16; // P
    pub const RETRIG: u8 = 17; // Q
    pub const TREMOLO: u8 = 18; // R
    pub const EXTENDED: u8 = 19; // S
    pub const TEMPO: u8 = 20; // T
    pub const FINE_VIBRATO: u8 = 21; // U
    pub const GLOBAL_VOLUME: u8 = 22; // V
    pub const GLOBAL_VOLSLIDE: u8 = 23; // W
    pub const PAN: u8 = 24; // X
    pub const PANBRELLO: u8 = 25; // Y
}

/// One entry of a translation table: target effect in the high byte of
/// `base`, preset operand bits in the low byte; `mask` selects which bits
/// of the source operand are merged in.
#[derive(Debug, Clone, Copy)]
pub struct EffectRule {
    pub base: u16,
    pub mask: u8,
}

/// `base` sentinel: the effect column is dropped for this code.
pub const DROP: u16 = 0xFFFF;

const fn rule(base: u16, mask: u8) -> EffectRule {
    EffectRule { base, mask }
}

/// Krawall → XM. Codes that branch on their operand (6, 11, 15, 23, 24, 29,
/// 43 and the speed family) carry their plain-command default here; the
/// branching lives in [`XmEffectTranslator::translate`].
#[rustfmt::skip]
pub const XM_RULES: [EffectRule; EFFECT_COUNT] = [
    rule(DROP,   0x00), // 0  none
    rule(0x0F00, 0xFF), // 1  speed (dropped when 0 or >= 0x20)
    rule(0x0F00, 0xFF), // 2  BPM
    rule(0x0F00, 0xFF), // 3  speed/BPM combined
    rule(0x0B00, 0xFF), // 4  pattern jump
    rule(0x0D00, 0xFF), // 5  pattern break
    rule(0x0A00, 0xFF), // 6  volume slide (S3M memory + fine nibbles)
    rule(0x0A00, 0xFF), // 7  volume slide
    rule(0x0EB0, 0x0F), // 8  fine volume slide down
    rule(0x0EA0, 0x0F), // 9  fine volume slide up
    rule(0x0200, 0xFF), // 10 portamento down
    rule(0x0200, 0xFF), // 11 portamento down (S3M memory + fine nibbles)
    rule(0x0E20, 0x0F), // 12 fine portamento down
    rule(0x2120, 0x0F), // 13 extra fine portamento down
    rule(0x0100, 0xFF), // 14 portamento up
    rule(0x0100, 0xFF), // 15 portamento up (S3M memory + fine nibbles)
    rule(0x0E10, 0x0F), // 16 fine portamento up
    rule(0x2110, 0x0F), // 17 extra fine portamento up
    rule(0x0C00, 0xFF), // 18 set volume
    rule(0x0300, 0xFF), // 19 tone portamento
    rule(0x0400, 0xFF), // 20 vibrato
    rule(0x1D00, 0xFF), // 21 tremor
    rule(0x0000, 0xFF), // 22 arpeggio
    rule(0x0600, 0xFF), // 23 volume slide + vibrato (fine part splits off)
    rule(0x0500, 0xFF), // 24 volume slide + tone portamento
    rule(DROP,   0x00), // 25 channel volume
    rule(DROP,   0x00), // 26 channel volume slide
    rule(0x0900, 0xFF), // 27 sample offset
    rule(0x1900, 0xFF), // 28 panning slide
    rule(0x1B00, 0xFF), // 29 retrigger (slide nibble forced non-zero)
    rule(0x0700, 0xFF), // 30 tremolo
    rule(DROP,   0x00), // 31 fine vibrato
    rule(0x1000, 0xFF), // 32 global volume
    rule(0x1100, 0xFF), // 33 global volume slide
    rule(0x0800, 0xFF), // 34 set panning
    rule(0x2200, 0xFF), // 35 panbrello (OpenMPT only)
    rule(DROP,   0x00), // 36 mark
    rule(0x0E30, 0x0F), // 37 glissando control
    rule(0x0E40, 0x0F), // 38 vibrato waveform
    rule(0x0E70, 0x0F), // 39 tremolo waveform
    rule(0x2150, 0x0F), // 40 panbrello waveform (OpenMPT only)
    rule(0x0EE0, 0x0F), // 41 pattern delay
    rule(0x0E80, 0x0F), // 42 coarse panning
    rule(0x0800, 0xFF), // 43 16-level panning (operand rescaled)
    rule(0x0EC0, 0x0F), // 44 note cut
    rule(0x0ED0, 0x0F), // 45 note delay
    rule(0x1500, 0xFF), // 46 envelope position
    rule(DROP,   0x00), // 47 sample offset high bits
    rule(0x1100, 0xFF), // 48 global volume slide
    rule(0x1400, 0xFF), // 49 key off
    rule(0x0E50, 0x0F), // 50 set finetune
];

/// Krawall → S3M. Codes 3 (speed/BPM), 9 (fine volume slide up), 18
/// (set volume) and 43 (16-level panning) branch in [`translate_s3m`].
#[rustfmt::skip]
pub const S3M_RULES: [EffectRule; EFFECT_COUNT] = [
    rule(DROP,   0x00), // 0  none
    rule(0x0100, 0xFF), // 1  speed
    rule(0x1400, 0xFF), // 2  BPM
    rule(0x0100, 0xFF), // 3  speed/BPM combined (T when operand >= 0x20)
    rule(0x0200, 0xFF), // 4  pattern jump
    rule(0x0300, 0xFF), // 5  pattern break
    rule(0x0400, 0xFF), // 6  volume slide
    rule(0x0400, 0xFF), // 7  volume slide
    rule(0x04F0, 0x0F), // 8  fine volume slide down
    rule(0x040F, 0xF0), // 9  fine volume slide up (operand shifts left)
    rule(0x0500, 0xFF), // 10 portamento down
    rule(0x0500, 0xFF), // 11 portamento down
    rule(0x05F0, 0x0F), // 12 fine portamento down
    rule(0x05E0, 0x0F), // 13 extra fine portamento down
    rule(0x0600, 0xFF), // 14 portamento up
    rule(0x0600, 0xFF), // 15 portamento up
    rule(0x06F0, 0x0F), // 16 fine portamento up
    rule(0x06E0, 0x0F), // 17 extra fine portamento up
    rule(DROP,   0x00), // 18 set volume (moves to the volume column)
    rule(0x0700, 0xFF), // 19 tone portamento
    rule(0x0800, 0xFF), // 20 vibrato
    rule(0x0900, 0xFF), // 21 tremor
    rule(0x0A00, 0xFF), // 22 arpeggio
    rule(0x0B00, 0xFF), // 23 volume slide + vibrato
    rule(0x0C00, 0xFF), // 24 volume slide + tone portamento
    rule(0x0D00, 0xFF), // 25 channel volume
    rule(0x0E00, 0xFF), // 26 channel volume slide
    rule(0x0F00, 0xFF), // 27 sample offset
    rule(0x1000, 0xFF), // 28 panning slide
    rule(0x1100, 0xFF), // 29 retrigger
    rule(0x1200, 0xFF), // 30 tremolo
    rule(0x1500, 0xFF), // 31 fine vibrato
    rule(0x1600, 0xFF), // 32 global volume
    rule(0x1700, 0xFF), // 33 global volume slide
    rule(0x1800, 0xFF), // 34 set panning
    rule(0x1900, 0xFF), // 35 panbrello
    rule(DROP,   0x00), // 36 mark
    rule(0x1310, 0x0F), // 37 glissando control
    rule(0x1330, 0x0F), // 38 vibrato waveform
    rule(0x1340, 0x0F), // 39 tremolo waveform
    rule(0x1350, 0x0F), // 40 panbrello waveform
    rule(0x13E0, 0x0F), // 41 pattern delay
    rule(0x1380, 0x0F), // 42 coarse panning
    rule(0x1800, 0xFF), // 43 16-level panning (operand rescaled)
    rule(0x13C0, 0x0F), // 44 note cut
    rule(0x13D0, 0x0F), // 45 note delay
    rule(DROP,   0x00), // 46 envelope position
    rule(DROP,   0x00), // 47 sample offset high bits
    rule(0x1700, 0xFF), // 48 global volume slide
    rule(DROP,   0x00), // 49 key off
    rule(0x1320, 0x0F), // 50 set finetune
];

/// Warnings raised while translating, deduplicated per pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectWarning {
    ChannelVolume,
    ChannelVolumeSlide,
    FineVibrato,
    Mark,
    Panbrello,
    PanbrelloWaveform,
    SpeedRange,
    OffsetHigh,
    KeyOff,
    EnvelopePosition,
    FineSlideLost,
    SetVolumeLost,
    VolumeColumnLost,
    PanLost,
    UnknownEffect,
}

impl EffectWarning {
    fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Message shown to the user, once per pattern.
    pub fn message(self) -> &'static str {
        match self {
            EffectWarning::ChannelVolume => "channel volume effect has no XM equivalent",
            EffectWarning::ChannelVolumeSlide => "channel volume slide has no XM equivalent",
            EffectWarning::FineVibrato => "fine vibrato has no XM equivalent",
            EffectWarning::Mark => "mark effect cannot be represented",
            EffectWarning::Panbrello => "panbrello only plays back in OpenMPT",
            EffectWarning::PanbrelloWaveform => "panbrello waveform only plays back in OpenMPT",
            EffectWarning::SpeedRange => "speed out of range for the XM speed command",
            EffectWarning::OffsetHigh => "high sample offset cannot be represented",
            EffectWarning::KeyOff => "key-off effect has no S3M equivalent",
            EffectWarning::EnvelopePosition => "envelope position has no S3M equivalent",
            EffectWarning::FineSlideLost => "fine volume slide lost (volume column occupied)",
            EffectWarning::SetVolumeLost => "set volume lost (volume column occupied)",
            EffectWarning::VolumeColumnLost => "volume column value cannot be represented",
            EffectWarning::PanLost => "channel panning could not be asserted",
            EffectWarning::UnknownEffect => "unknown effect code",
        }
    }
}

/// A per-pattern one-shot warning set, backed by a bitfield.
#[derive(Debug, Default)]
pub struct WarningSet(u32);

impl WarningSet {
    pub fn new() -> Self {
        WarningSet(0)
    }

    /// Forget everything; call at the start of each pattern.
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Report `warning` for `pattern` unless it was already reported for
    /// this pattern. Returns whether anything was printed.
    pub fn warn(&mut self, warning: EffectWarning, pattern: usize) -> bool {
        if self.0 & warning.bit() != 0 {
            return false;
        }
        self.0 |= warning.bit();
        eprintln!("warning: {} (pattern {})", warning.message(), pattern);
        true
    }
}

/// Result of translating one effect column entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translation {
    /// Effect command and operand for the target's effect slot.
    pub effect: Option<(u8, u8)>,
    /// Value for the target's volume column (fine-slide split or volume
    /// move); only produced when the caller said the column was free.
    pub volume: Option<u8>,
    pub warning: Option<EffectWarning>,
}

impl Translation {
    fn effect(fx: u8, op: u8) -> Self {
        Translation {
            effect: Some((fx, op)),
            ..Translation::default()
        }
    }

    fn drop_with(warning: EffectWarning) -> Self {
        Translation {
            warning: Some(warning),
            ..Translation::default()
        }
    }
}

/// Detect a fine slide in an S3M-style volume slide operand. Returns the
/// equivalent XM volume-column byte when the operand encodes one.
fn fine_volslide(op: u8) -> Option<u8> {
    let hi = op >> 4;
    let lo = op & 0x0F;
    if lo == 0x0F && hi != 0 {
        Some(0x90 | hi) // fine slide up in the XM volume column
    } else if hi == 0x0F && lo != 0 {
        Some(0x80 | lo) // fine slide down
    } else {
        None
    }
}

/// Stateful Krawall → XM effect translator.
///
/// Holds the per-channel operand memories that S3M-style commands rely on:
/// one shared by the volume-slide family (codes 6, 23, 24) and one shared
/// by the portamento pair (codes 11, 15). State lives for one module.
#[derive(Debug)]
pub struct XmEffectTranslator {
    slide_memory: Vec<u8>,
    porta_memory: Vec<u8>,
}

impl XmEffectTranslator {
    pub fn new(channels: usize) -> Self {
        XmEffectTranslator {
            slide_memory: vec![0; channels],
            porta_memory: vec![0; channels],
        }
    }

    fn slide_op(&mut self, channel: usize, op: u8) -> u8 {
        if op != 0 {
            self.slide_memory[channel] = op;
            op
        } else {
            self.slide_memory[channel]
        }
    }

    fn porta_op(&mut self, channel: usize, op: u8) -> u8 {
        if op != 0 {
            self.porta_memory[channel] = op;
            op
        } else {
            self.porta_memory[channel]
        }
    }

    /// Translate one Krawall effect for `channel`. `volume_free` tells the
    /// translator whether the cell's volume column is empty and may receive
    /// a split-off fine slide.
    pub fn translate(
        &mut self,
        channel: usize,
        effect: u8,
        op: u8,
        volume_free: bool,
    ) -> Translation {
        use codes::*;
        match effect {
            NONE => Translation::default(),

            SPEED if op == 0 || op >= 0x20 => Translation::drop_with(EffectWarning::SpeedRange),

            VOLSLIDE_S3M => {
                let op = self.slide_op(channel, op);
                match fine_volslide(op) {
                    // EAx / EBx carry the fine slide in XM.
                    Some(vol) if vol & 0xF0 == 0x90 => {
                        Translation::effect(xm_fx::EXTENDED, 0xA0 | (vol & 0x0F))
                    }
                    Some(vol) => Translation::effect(xm_fx::EXTENDED, 0xB0 | (vol & 0x0F)),
                    None => Translation::effect(xm_fx::VOLSLIDE, op),
                }
            }

            PORTA_DOWN_S3M => {
                let op = self.porta_op(channel, op);
                match op >> 4 {
                    0xF => Translation::effect(xm_fx::EXTENDED, 0x20 | (op & 0x0F)),
                    0xE => Translation::effect(xm_fx::EXTRA_FINE, 0x20 | (op & 0x0F)),
                    _ => Translation::effect(xm_fx::PORTA_DOWN, op),
                }
            }

            PORTA_UP_S3M => {
                let op = self.porta_op(channel, op);
                match op >> 4 {
                    0xF => Translation::effect(xm_fx::EXTENDED, 0x10 | (op & 0x0F)),
                    0xE => Translation::effect(xm_fx::EXTRA_FINE, 0x10 | (op & 0x0F)),
                    _ => Translation::effect(xm_fx::PORTA_UP, op),
                }
            }

            VOLSLIDE_VIBRATO | VOLSLIDE_PORTA => {
                let continued = if effect == VOLSLIDE_VIBRATO {
                    xm_fx::VIBRATO
                } else {
                    xm_fx::PORTA_NOTE
                };
                let op = self.slide_op(channel, op);
                match fine_volslide(op) {
                    // XM 5xx/6xx cannot express a fine slide; the slide
                    // moves to the volume column and the effect slot keeps
                    // the vibrato/portamento going.
                    Some(vol) if volume_free => Translation {
                        effect: Some((continued, 0)),
                        volume: Some(vol),
                        warning: None,
                    },
                    Some(_) => Translation {
                        effect: Some((continued, 0)),
                        volume: None,
                        warning: Some(EffectWarning::FineSlideLost),
                    },
                    None => Translation::effect(
                        if effect == VOLSLIDE_VIBRATO {
                            xm_fx::VIBRATO_VOLSLIDE
                        } else {
                            xm_fx::PORTA_VOLSLIDE
                        },
                        op,
                    ),
                }
            }

            // XM retriggers need a non-zero volume-slide nibble; 8 is "no
            // volume change".
            RETRIG if op & 0xF0 == 0 => Translation::effect(xm_fx::RETRIG, op | 0x80),

            PAN_16 => Translation::effect(xm_fx::PAN, (op & 0x0F) * 0x11),

            PANBRELLO => {
                let mut t = Translation::effect(xm_fx::PANBRELLO, op);
                t.warning = Some(EffectWarning::Panbrello);
                t
            }
            PANBRELLO_WAVEFORM => {
                let mut t = Translation::effect(xm_fx::EXTRA_FINE, 0x50 | (op & 0x0F));
                t.warning = Some(EffectWarning::PanbrelloWaveform);
                t
            }

            _ => apply_rule(&XM_RULES, effect, op, xm_drop_warning),
        }
    }
}

/// Translate one Krawall effect to S3M. `volume_free` allows the set-volume
/// code to move into the cell's volume column.
pub fn translate_s3m(effect: u8, op: u8, volume_free: bool) -> Translation {
    use codes::*;
    match effect {
        NONE => Translation::default(),

        SPEED_BPM if op >= 0x20 => Translation::effect(s3m_fx::TEMPO, op),

        FINE_VOLSLIDE_UP => Translation::effect(s3m_fx::VOLSLIDE, (op << 4) | 0x0F),

        SET_VOLUME if volume_free => Translation {
            volume: Some(op.min(64)),
            ..Translation::default()
        },
        SET_VOLUME => Translation::drop_with(EffectWarning::SetVolumeLost),

        // S3M's X command tops out at 0x80, half of XM's pan scale.
        PAN_16 => Translation::effect(s3m_fx::PAN, ((op & 0x0F) as u16 * 0x11 / 2) as u8),

        _ => apply_rule(&S3M_RULES, effect, op, s3m_drop_warning),
    }
}

fn apply_rule(
    table: &[EffectRule; EFFECT_COUNT],
    effect: u8,
    op: u8,
    drop_warning: fn(u8) -> Option<EffectWarning>,
) -> Translation {
    let Some(rule) = table.get(effect as usize) else {
        return Translation::drop_with(EffectWarning::UnknownEffect);
    };
    if rule.base == DROP {
        return match drop_warning(effect) {
            Some(w) => Translation::drop_with(w),
            None => Translation::default(),
        };
    }
    Translation::effect(
        (rule.base >> 8) as u8,
        (rule.base & 0xFF) as u8 | (op & rule.mask),
    )
}

fn xm_drop_warning(effect: u8) -> Option<EffectWarning> {
    match effect {
        codes::CHANNEL_VOLUME => Some(EffectWarning::ChannelVolume),
        codes::CHANNEL_VOLSLIDE => Some(EffectWarning::ChannelVolumeSlide),
        codes::FINE_VIBRATO => Some(EffectWarning::FineVibrato),
        codes::MARK => Some(EffectWarning::Mark),
        codes::OFFSET_HIGH => Some(EffectWarning::OffsetHigh),
        codes::NONE => None,
        _ => Some(EffectWarning::UnknownEffect),
    }
}

fn s3m_drop_warning(effect: u8) -> Option<EffectWarning> {
    match effect {
        codes::MARK => Some(EffectWarning::Mark),
        codes::ENVELOPE_POS => Some(EffectWarning::EnvelopePosition),
        codes::OFFSET_HIGH => Some(EffectWarning::OffsetHigh),
        codes::KEY_OFF => Some(EffectWarning::KeyOff),
        codes::NONE | codes::SET_VOLUME => None,
        _ => Some(EffectWarning::UnknownEffect),
    }
}
