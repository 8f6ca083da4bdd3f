//! Minimal WAV serialization for exported samples.
use crate::krawall::Sample;

/// Render one sample as a mono RIFF/WAVE file at its reference playback
/// rate. 8-bit samples become unsigned 8-bit PCM (the WAV convention),
/// 16-bit samples stay signed.
pub fn sample_to_wav(sample: &Sample) -> Vec<u8> {
    let bits: u16 = if sample.hq { 16 } else { 8 };
    let block_align = (bits / 8) as u32;
    let byte_rate = sample.c2_freq * block_align;
    let data_len = sample.data.len() as u32;

    let mut out = Vec::with_capacity(44 + sample.data.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample.c2_freq.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&(block_align as u16).to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    if sample.hq {
        out.extend_from_slice(&sample.data);
    } else {
        out.extend(sample.data.iter().map(|b| b.wrapping_add(0x80)));
    }
    out
}
