//! Effect translation tables: branch cases, operand memory and the
//! once-per-pattern warning bitfield.
use unkrawerter::effects::{
    EffectWarning, WarningSet, XmEffectTranslator, codes, s3m_fx, translate_s3m, xm_fx,
};

#[test]
fn s3m_speed_bpm_branches_on_operand() {
    assert_eq!(
        translate_s3m(codes::SPEED_BPM, 0x1F, true).effect,
        Some((s3m_fx::SPEED, 0x1F))
    );
    assert_eq!(
        translate_s3m(codes::SPEED_BPM, 0x80, true).effect,
        Some((s3m_fx::TEMPO, 0x80))
    );
}

#[test]
fn s3m_fine_volume_slide_up_shifts_its_operand() {
    assert_eq!(
        translate_s3m(codes::FINE_VOLSLIDE_UP, 0x05, true).effect,
        Some((s3m_fx::VOLSLIDE, 0x5F))
    );
}

#[test]
fn s3m_set_volume_moves_to_the_volume_column() {
    let t = translate_s3m(codes::SET_VOLUME, 0x30, true);
    assert_eq!(t.effect, None);
    assert_eq!(t.volume, Some(0x30));
    let t = translate_s3m(codes::SET_VOLUME, 0x30, false);
    assert_eq!(t.volume, None);
    assert_eq!(t.warning, Some(EffectWarning::SetVolumeLost));
}

#[test]
fn xm_retrig_gets_a_nonzero_slide_nibble() {
    let mut t = XmEffectTranslator::new(1);
    assert_eq!(
        t.translate(0, codes::RETRIG, 0x04, true).effect,
        Some((xm_fx::RETRIG, 0x84))
    );
    assert_eq!(
        t.translate(0, codes::RETRIG, 0x24, true).effect,
        Some((xm_fx::RETRIG, 0x24))
    );
}

#[test]
fn xm_speed_out_of_range_is_dropped() {
    let mut t = XmEffectTranslator::new(1);
    let dropped = t.translate(0, codes::SPEED, 0x20, true);
    assert_eq!(dropped.effect, None);
    assert_eq!(dropped.warning, Some(EffectWarning::SpeedRange));
    let dropped = t.translate(0, codes::SPEED, 0x00, true);
    assert_eq!(dropped.warning, Some(EffectWarning::SpeedRange));
    assert_eq!(
        t.translate(0, codes::SPEED, 0x1F, true).effect,
        Some((xm_fx::SPEED, 0x1F))
    );
}

#[test]
fn xm_volume_slide_fine_nibbles_use_extended_commands() {
    let mut t = XmEffectTranslator::new(1);
    assert_eq!(
        t.translate(0, codes::VOLSLIDE_S3M, 0x3F, true).effect,
        Some((xm_fx::EXTENDED, 0xA3)) // fine up by 3
    );
    assert_eq!(
        t.translate(0, codes::VOLSLIDE_S3M, 0xF3, true).effect,
        Some((xm_fx::EXTENDED, 0xB3)) // fine down by 3
    );
    assert_eq!(
        t.translate(0, codes::VOLSLIDE_S3M, 0x30, true).effect,
        Some((xm_fx::VOLSLIDE, 0x30))
    );
}

#[test]
fn xm_combined_slides_split_fine_parts_into_the_volume_column() {
    let mut t = XmEffectTranslator::new(1);
    let split = t.translate(0, codes::VOLSLIDE_VIBRATO, 0x4F, true);
    assert_eq!(split.effect, Some((xm_fx::VIBRATO, 0)));
    assert_eq!(split.volume, Some(0x94)); // fine volume up 4

    let lost = t.translate(0, codes::VOLSLIDE_PORTA, 0xF2, false);
    assert_eq!(lost.effect, Some((xm_fx::PORTA_NOTE, 0)));
    assert_eq!(lost.volume, None);
    assert_eq!(lost.warning, Some(EffectWarning::FineSlideLost));

    let plain = t.translate(0, codes::VOLSLIDE_VIBRATO, 0x20, true);
    assert_eq!(plain.effect, Some((xm_fx::VIBRATO_VOLSLIDE, 0x20)));
}

#[test]
fn xm_channel_volume_and_mark_are_dropped_with_warnings() {
    let mut t = XmEffectTranslator::new(1);
    for (code, warning) in [
        (codes::CHANNEL_VOLUME, EffectWarning::ChannelVolume),
        (codes::CHANNEL_VOLSLIDE, EffectWarning::ChannelVolumeSlide),
        (codes::FINE_VIBRATO, EffectWarning::FineVibrato),
        (codes::MARK, EffectWarning::Mark),
    ] {
        let t = t.translate(0, code, 0x10, true);
        assert_eq!(t.effect, None);
        assert_eq!(t.warning, Some(warning));
    }
}

#[test]
fn xm_mpt_only_effects_are_emitted_but_warned() {
    let mut t = XmEffectTranslator::new(1);
    let panbrello = t.translate(0, codes::PANBRELLO, 0x24, true);
    assert_eq!(panbrello.effect, Some((xm_fx::PANBRELLO, 0x24)));
    assert_eq!(panbrello.warning, Some(EffectWarning::Panbrello));
}

#[test]
fn xm_table_spot_checks() {
    let mut t = XmEffectTranslator::new(1);
    assert_eq!(
        t.translate(0, codes::ARPEGGIO, 0x37, true).effect,
        Some((xm_fx::ARPEGGIO, 0x37))
    );
    assert_eq!(
        t.translate(0, codes::PATTERN_DELAY, 0x03, true).effect,
        Some((xm_fx::EXTENDED, 0xE3))
    );
    assert_eq!(
        t.translate(0, codes::NOTE_CUT, 0x02, true).effect,
        Some((xm_fx::EXTENDED, 0xC2))
    );
    assert_eq!(
        t.translate(0, codes::PAN_16, 0x08, true).effect,
        Some((xm_fx::PAN, 0x88))
    );
}

#[test]
fn s3m_table_spot_checks() {
    assert_eq!(
        translate_s3m(codes::GLISSANDO, 0x01, true).effect,
        Some((s3m_fx::EXTENDED, 0x11))
    );
    assert_eq!(
        translate_s3m(codes::NOTE_DELAY, 0x03, true).effect,
        Some((s3m_fx::EXTENDED, 0xD3))
    );
    assert_eq!(
        translate_s3m(codes::SAMPLE_OFFSET, 0x40, true).effect,
        Some((s3m_fx::OFFSET, 0x40))
    );
    assert_eq!(
        translate_s3m(codes::RETRIG, 0x12, true).effect,
        Some((s3m_fx::RETRIG, 0x12))
    );
}

#[test]
fn warnings_fire_once_per_pattern() {
    let mut warnings = WarningSet::new();
    assert!(warnings.warn(EffectWarning::ChannelVolume, 0));
    assert!(!warnings.warn(EffectWarning::ChannelVolume, 0));
    assert!(warnings.warn(EffectWarning::Mark, 0));
    warnings.reset();
    assert!(warnings.warn(EffectWarning::ChannelVolume, 1));
}
