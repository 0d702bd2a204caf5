//! Decode engine tests against the in-memory store.

use std::path::Path;

use sforzato_sf2::{
    CurveType, DefaultModulator, FieldValue, GeneratorField, MemoryStore, ModSource,
    RegisteredSample, SourceController, Transform,
};
use sforzato_sfz::{decode, Opcode, ParameterGroup, ParameterScope};

fn mono(length: u32) -> RegisteredSample {
    RegisteredSample {
        channels: 1,
        loop_start: 800,
        loop_end: length - 100,
        length,
        correction: 0,
    }
}

fn stereo(length: u32) -> RegisteredSample {
    RegisteredSample {
        channels: 2,
        ..mono(length)
    }
}

fn source_path() -> &'static Path {
    Path::new("/instruments")
}

fn region_with_sample(sample: &str) -> ParameterScope {
    let mut region = ParameterScope::new();
    region.set_text(Opcode::Sample, sample);
    region
}

fn group_of(regions: Vec<ParameterScope>) -> ParameterGroup {
    let mut group = ParameterGroup::new(ParameterScope::new());
    for region in regions {
        group.push_region(region);
    }
    group
}

#[test]
fn mono_region_becomes_one_linked_division() {
    let mut store = MemoryStore::new();
    store.register_sample("kick.wav", mono(4410)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("kick.wav");
    region.set_integer(Opcode::KeyMin, 36);
    region.set_integer(Opcode::KeyMax, 38);

    let summary = decode(group_of(vec![region]), &mut store, instrument, source_path());

    assert_eq!(summary.divisions, 1);
    assert_eq!(summary.skipped_regions, 0);

    let divisions = store.instrument_divisions(instrument);
    assert_eq!(divisions.len(), 1);
    assert!(divisions[0].sample.is_some());
    assert_eq!(
        divisions[0].field(GeneratorField::KeyRange),
        Some(FieldValue::Range(36, 38))
    );
}

#[test]
fn mono_pan_is_scaled_by_five() {
    let mut store = MemoryStore::new();
    store.register_sample("kick.wav", mono(4410)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("kick.wav");
    region.set_real(Opcode::Pan, -30.0);

    decode(group_of(vec![region]), &mut store, instrument, source_path());

    let divisions = store.instrument_divisions(instrument);
    assert_eq!(
        divisions[0].field(GeneratorField::Pan),
        Some(FieldValue::Signed(-150))
    );
}

#[test]
fn stereo_defaults_spread_full_width_centered() {
    let mut store = MemoryStore::new();
    store.register_sample("piano.wav", stereo(48000)).unwrap();
    let instrument = store.create_instrument();

    let region = region_with_sample("piano.wav");
    let summary = decode(group_of(vec![region]), &mut store, instrument, source_path());

    assert_eq!(summary.divisions, 2);
    let divisions = store.instrument_divisions(instrument);
    assert_eq!(
        divisions[0].field(GeneratorField::Pan),
        Some(FieldValue::Signed(-500))
    );
    assert_eq!(
        divisions[1].field(GeneratorField::Pan),
        Some(FieldValue::Signed(500))
    );
    // no pan opcode: neither channel is attenuated
    assert_eq!(divisions[0].field(GeneratorField::InitialAttenuation), None);
    assert_eq!(divisions[1].field(GeneratorField::InitialAttenuation), None);
}

#[test]
fn stereo_width_and_position_shape_the_image() {
    let mut store = MemoryStore::new();
    store.register_sample("piano.wav", stereo(48000)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("piano.wav");
    region.set_real(Opcode::Width, 40.0);
    region.set_real(Opcode::Position, 50.0);

    decode(group_of(vec![region]), &mut store, instrument, source_path());

    // width 40 % -> 200 units; position 50 % -> 0.5 * (500 - 200) = 150
    let divisions = store.instrument_divisions(instrument);
    assert_eq!(
        divisions[0].field(GeneratorField::Pan),
        Some(FieldValue::Signed(-50))
    );
    assert_eq!(
        divisions[1].field(GeneratorField::Pan),
        Some(FieldValue::Signed(350))
    );
}

#[test]
fn extreme_width_position_combinations_are_clamped() {
    let mut store = MemoryStore::new();
    store.register_sample("piano.wav", stereo(48000)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("piano.wav");
    region.set_real(Opcode::Width, 120.0);
    region.set_real(Opcode::Position, -100.0);

    decode(group_of(vec![region]), &mut store, instrument, source_path());

    // width 120 % -> 600 units, position -100 % -> -100 units: the raw
    // pans -700 and +500 must stay within the representable field range
    let divisions = store.instrument_divisions(instrument);
    assert_eq!(
        divisions[0].field(GeneratorField::Pan),
        Some(FieldValue::Signed(-500))
    );
    assert_eq!(
        divisions[1].field(GeneratorField::Pan),
        Some(FieldValue::Signed(500))
    );
}

#[test]
fn stereo_pan_attenuates_the_opposite_channel() {
    let mut store = MemoryStore::new();
    store.register_sample("piano.wav", stereo(48000)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("piano.wav");
    region.set_real(Opcode::Pan, -50.0);

    decode(group_of(vec![region]), &mut store, instrument, source_path());

    // pan left: the right division (index 1) is attenuated by
    // -percent_to_db(50) = 6.02 dB -> 151 stored units
    let divisions = store.instrument_divisions(instrument);
    assert_eq!(divisions[0].field(GeneratorField::InitialAttenuation), None);
    assert_eq!(
        divisions[1].field(GeneratorField::InitialAttenuation),
        Some(FieldValue::Signed(151))
    );
}

#[test]
fn stereo_center_pan_attenuates_neither_channel() {
    let mut store = MemoryStore::new();
    store.register_sample("piano.wav", stereo(48000)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("piano.wav");
    region.set_real(Opcode::Pan, 0.0);

    decode(group_of(vec![region]), &mut store, instrument, source_path());

    let divisions = store.instrument_divisions(instrument);
    assert_eq!(divisions[0].field(GeneratorField::InitialAttenuation), None);
    assert_eq!(divisions[1].field(GeneratorField::InitialAttenuation), None);
}

#[test]
fn hard_right_pan_collapses_to_the_right_sample() {
    let mut store = MemoryStore::new();
    store.register_sample("piano.wav", stereo(48000)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("piano.wav");
    region.set_real(Opcode::Pan, 100.0);

    let summary = decode(group_of(vec![region]), &mut store, instrument, source_path());

    // the left sample (index 0) is dropped, the right one is kept and
    // the region decodes through the mono path
    assert_eq!(summary.divisions, 1);
    let divisions = store.instrument_divisions(instrument);
    let linked = divisions[0].sample.unwrap();
    assert_eq!(store.sample_name(linked), "piano.wav R");
    assert_eq!(
        divisions[0].field(GeneratorField::Pan),
        Some(FieldValue::Signed(500))
    );
}

#[test]
fn hard_left_pan_collapses_to_the_left_sample() {
    let mut store = MemoryStore::new();
    store.register_sample("piano.wav", stereo(48000)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("piano.wav");
    region.set_real(Opcode::Pan, -99.9);

    let summary = decode(group_of(vec![region]), &mut store, instrument, source_path());

    assert_eq!(summary.divisions, 1);
    let divisions = store.instrument_divisions(instrument);
    let linked = divisions[0].sample.unwrap();
    assert_eq!(store.sample_name(linked), "piano.wav L");
}

#[test]
fn offsets_are_rebased_on_the_stored_sample() {
    let mut store = MemoryStore::new();
    // stored geometry: loop 800..47900, length 48000
    store.register_sample("piano.wav", mono(48000)).unwrap();
    let instrument = store.create_instrument();

    let mut region = region_with_sample("piano.wav");
    region.set_integer(Opcode::LoopStart, 1000);
    region.set_integer(Opcode::LoopEnd, 47000);
    region.set_integer(Opcode::End, 47500);

    decode(group_of(vec![region]), &mut store, instrument, source_path());

    let divisions = store.instrument_divisions(instrument);
    assert_eq!(
        divisions[0].field(GeneratorField::StartLoopOffset),
        Some(FieldValue::Signed(200))
    );
    assert_eq!(
        divisions[0].field(GeneratorField::EndLoopOffset),
        Some(FieldValue::Signed(-900))
    );
    assert_eq!(
        divisions[0].field(GeneratorField::EndOffset),
        Some(FieldValue::Signed(-500))
    );
}

#[test]
fn unresolvable_region_contributes_no_division() {
    let mut store = MemoryStore::new();
    store.register_sample("kick.wav", mono(4410)).unwrap();
    let instrument = store.create_instrument();

    let group = group_of(vec![
        region_with_sample("missing.wav"),
        region_with_sample("kick.wav"),
    ]);
    let summary = decode(group, &mut store, instrument, source_path());

    assert_eq!(summary.divisions, 1);
    assert_eq!(summary.skipped_regions, 1);
}

#[test]
fn global_scope_decodes_onto_the_instrument_zone() {
    let mut store = MemoryStore::new();
    store.register_sample("kick.wav", mono(4410)).unwrap();
    let instrument = store.create_instrument();

    let mut global = ParameterScope::new();
    global.set_real(Opcode::Volume, -4.0);
    global.set_real(Opcode::AmpEnvRelease, 0.5);

    let mut group = ParameterGroup::new(global);
    group.push_region(region_with_sample("kick.wav"));

    decode(group, &mut store, instrument, source_path());

    // -(-4 dB) = 4 dB attenuation -> 100 stored units
    assert_eq!(
        store.global_field(instrument, GeneratorField::InitialAttenuation),
        Some(FieldValue::Signed(100))
    );
    // 0.5 s release -> -1200 timecents
    assert_eq!(
        store.global_field(instrument, GeneratorField::ReleaseVolEnv),
        Some(FieldValue::Signed(-1200))
    );
}

#[test]
fn default_modulators_are_countered_once_per_instrument() {
    let mut store = MemoryStore::new();
    let instrument = store.create_instrument();

    // even an empty group installs the overrides
    decode(group_of(vec![]), &mut store, instrument, source_path());

    let modulators = store.modulators();
    assert_eq!(modulators.len(), DefaultModulator::ALL.len());

    for (modulator, default) in modulators.iter().zip(DefaultModulator::ALL) {
        assert_eq!(modulator.source, Some(default.source()));
        assert_eq!(modulator.destination, Some(default.destination()));
        assert_eq!(modulator.amount, Some(0));
        assert_eq!(modulator.amount_source, Some(ModSource::no_controller()));
        assert_eq!(modulator.transform, Some(Transform::Linear));
    }

    // the attenuation override counters the concave velocity curve
    let attenuation = &modulators[0];
    let source = attenuation.source.unwrap();
    assert_eq!(source.controller, SourceController::NoteOnVelocity);
    assert_eq!(source.curve, CurveType::Concave);
}
