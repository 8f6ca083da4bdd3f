//! S3M writer: refusals, header numerology, parapointer alignment and the
//! pattern rewrites.
mod common;

use common::{ModuleSpec, RomBuilder, cell, empty_rows, row};
use unkrawerter::RipError;
use unkrawerter::effects::codes;
use unkrawerter::s3m::{S3mOptions, write_module};
use unkrawerter::version::DEFAULT_VERSION;

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes(bytes[at..at + 2].try_into().unwrap())
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

/// One-channel module with a single 64-row pattern and one 4-byte sample.
fn simple_rom(stream: &[u8]) -> (Vec<u8>, u32, Vec<u32>) {
    let mut b = RomBuilder::new();
    b.gap(16);
    let sample = b.sample(&[1, 2, 3, 4], 8363, 0);
    let pattern = b.pattern(64, stream);
    let module = b.module(&ModuleSpec::default(), &[pattern]);
    (b.finish(), module, vec![sample])
}

#[test]
fn instrument_based_modules_are_refused() {
    let mut b = RomBuilder::new();
    b.gap(16);
    let sample = b.sample(&[1, 2, 3, 4], 8363, 0);
    let pattern = b.pattern(64, &empty_rows(64));
    let module = b.module(
        &ModuleSpec {
            instrument_based: true,
            ..ModuleSpec::default()
        },
        &[pattern],
    );
    let rom = b.finish();
    match write_module(&rom, module, &[sample], DEFAULT_VERSION, &S3mOptions::default()) {
        Err(RipError::UnsupportedTargetFormat(_)) => {}
        other => panic!("expected refusal, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn non_64_row_patterns_are_refused() {
    let mut b = RomBuilder::new();
    b.gap(16);
    let sample = b.sample(&[1, 2, 3, 4], 8363, 0);
    let pattern = b.pattern(63, &empty_rows(63));
    let module = b.module(&ModuleSpec::default(), &[pattern]);
    let rom = b.finish();
    match write_module(&rom, module, &[sample], DEFAULT_VERSION, &S3mOptions::default()) {
        Err(RipError::UnsupportedTargetFormat(_)) => {}
        other => panic!("expected refusal, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn header_blocks_and_parapointers_line_up() {
    let stream = [row(&[cell(0, Some((49, 1)), None, None)]), empty_rows(63)].concat();
    let (rom, module, samples) = simple_rom(&stream);
    let out = write_module(&rom, module, &samples, DEFAULT_VERSION, &S3mOptions::default())
        .expect("s3m");

    assert_eq!(out[0x1C], 0x1A);
    assert_eq!(out[0x1D], 16);
    assert_eq!(read_u16(&out, 0x20), 1); // orders
    assert_eq!(read_u16(&out, 0x22), 1); // instruments
    assert_eq!(read_u16(&out, 0x24), 1); // patterns
    assert_eq!(read_u16(&out, 0x28), 0x2013); // tracker version
    assert_eq!(read_u16(&out, 0x2A), 2); // unsigned samples
    assert_eq!(&out[0x2C..0x30], b"SCRM");
    assert_eq!(out[0x30], 64); // global volume
    assert_eq!(out[0x31], 6); // speed
    assert_eq!(out[0x32], 125); // tempo
    assert_eq!(out[0x35], 0xFC); // default pans present
    assert_eq!(out[0x40], 8); // channel 0: right-half slot (no left half of one)
    assert_eq!(out[0x41], 0xFF); // channel 1: unused
    assert_eq!(out[0x60], 0); // order 0

    // Parapointers: one instrument header, one pattern.
    let instrument_para = read_u16(&out, 0x61) as usize * 16;
    let pattern_para = read_u16(&out, 0x63) as usize * 16;
    assert_eq!(instrument_para % 16, 0);
    assert_eq!(pattern_para % 16, 0);

    // The instrument header is a sample record.
    assert_eq!(out[instrument_para], 1);
    assert_eq!(&out[instrument_para + 76..instrument_para + 80], b"SCRS");
    assert_eq!(read_u32(&out, instrument_para + 16), 4); // length
    assert_eq!(read_u32(&out, instrument_para + 32), 8363); // c2 rate

    // Sample data sits where the memseg parapointer says, unsigned.
    let memseg = instrument_para + 13;
    let data_para =
        ((out[memseg] as usize) << 16 | read_u16(&out, memseg + 1) as usize) * 16;
    assert_eq!(data_para % 16, 0);
    assert_eq!(&out[data_para..data_para + 4], &[0x81, 0x82, 0x83, 0x84]);

    // Packed pattern: length word, one note cell, 64 row terminators.
    assert_eq!(read_u16(&out, pattern_para) as usize, 2 + 3 + 64);
    // Note 49 is octave 4, semitone 0; sample number is 1-based.
    assert_eq!(&out[pattern_para + 2..pattern_para + 6], &[0x20, 0x40, 1, 0]);
}

#[test]
fn volume_column_is_clamped_to_s3m_range() {
    let stream = [
        row(&[cell(0, None, Some(0x30), None)]), // volume 0x20
        row(&[cell(0, None, Some(0x05), None)]), // below range: empty marker
        row(&[cell(0, None, Some(0xC8), None)]), // pan: becomes an X effect
        empty_rows(61),
    ]
    .concat();
    let (rom, module, samples) = simple_rom(&stream);
    let out = write_module(&rom, module, &samples, DEFAULT_VERSION, &S3mOptions::default())
        .expect("s3m");

    let pattern_para = read_u16(&out, 0x63) as usize * 16;
    let body = pattern_para + 2;
    assert_eq!(&out[body..body + 3], &[0x40, 0x20, 0x00]); // vol + row end
    assert_eq!(&out[body + 3..body + 6], &[0x40, 0xFF, 0x00]);
    assert_eq!(
        &out[body + 6..body + 10],
        &[0x80, unkrawerter::effects::s3m_fx::PAN, 0x44, 0x00]
    );
}

#[test]
fn note_bytes_use_octave_semitone_nibbles() {
    let stream = [
        row(&[cell(0, Some((13, 1)), None, None)]), // C-1 -> 0x10
        row(&[cell(0, Some((0, 1)), None, None)]),  // key-off -> 254
        empty_rows(62),
    ]
    .concat();
    let (rom, module, samples) = simple_rom(&stream);
    let out = write_module(&rom, module, &samples, DEFAULT_VERSION, &S3mOptions::default())
        .expect("s3m");
    let body = read_u16(&out, 0x63) as usize * 16 + 2;
    assert_eq!(&out[body..body + 4], &[0x20, 0x10, 1, 0]);
    assert_eq!(&out[body + 4..body + 8], &[0x20, 254, 1, 0]);
}

#[test]
fn effects_go_through_the_s3m_table() {
    let stream = [
        row(&[cell(0, None, None, Some((codes::SPEED_BPM, 0x1F)))]),
        row(&[cell(0, None, None, Some((codes::SPEED_BPM, 0x80)))]),
        empty_rows(62),
    ]
    .concat();
    let (rom, module, samples) = simple_rom(&stream);
    let out = write_module(&rom, module, &samples, DEFAULT_VERSION, &S3mOptions::default())
        .expect("s3m");
    let body = read_u16(&out, 0x63) as usize * 16 + 2;
    assert_eq!(&out[body..body + 4], &[0x80, 0x01, 0x1F, 0]); // A 1F
    assert_eq!(&out[body + 4..body + 8], &[0x80, 0x14, 0x80, 0]); // T 80
}

#[test]
fn trimming_renumbers_samples() {
    // Plays sample 2 only; it must become sample 1 in the file.
    let stream = [row(&[cell(0, Some((49, 2)), None, None)]), empty_rows(63)].concat();
    let mut b = RomBuilder::new();
    b.gap(16);
    let s1 = b.sample(&[1, 1, 1, 1], 8363, 0);
    let s2 = b.sample(&[9, 9, 9, 9], 11025, 0);
    let pattern = b.pattern(64, &stream);
    let module = b.module(&ModuleSpec::default(), &[pattern]);
    let rom = b.finish();
    let out = write_module(&rom, module, &[s1, s2], DEFAULT_VERSION, &S3mOptions::default())
        .expect("s3m");

    assert_eq!(read_u16(&out, 0x22), 1); // one instrument written
    let instrument_para = read_u16(&out, 0x61) as usize * 16;
    assert_eq!(read_u32(&out, instrument_para + 32), 11025); // it is sample 2
    let body = read_u16(&out, 0x63) as usize * 16 + 2;
    assert_eq!(&out[body..body + 4], &[0x20, 0x40, 1, 0]);
}
