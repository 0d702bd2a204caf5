//! The decode engine: normalized parameter group → object-graph writes.
//!
//! Consumes a [`ParameterGroup`] whose regions are self-contained (see
//! [`pipeline::normalize`](crate::pipeline::normalize)) and emits
//! divisions, generator fields and modulators through a
//! [`SoundFontStore`]. The group is taken by value: a group decodes once
//! and is discarded.

use std::path::Path;

use sforzato_sf2::units;
use sforzato_sf2::{
    DefaultModulator, FieldTarget, FieldValue, GeneratorField, InstrumentId, ModSource, SampleId,
    SoundFontStore, Transform,
};

use crate::group::ParameterGroup;
use crate::opcode::Opcode;
use crate::scope::ParameterScope;

/// What one decode produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Sample-link divisions created under the instrument.
    pub divisions: usize,
    /// Regions that contributed no division (no resolvable sample).
    pub skipped_regions: usize,
}

/// Decode a normalized group onto an instrument.
///
/// The global scope decodes onto the instrument's global zone first, the
/// default-modulator overrides are installed at instrument level, then
/// each region in order resolves its samples and becomes one division
/// (mono) or two (stereo), with the pan/width/position synthesis applied.
pub fn decode<S: SoundFontStore>(
    group: ParameterGroup,
    store: &mut S,
    instrument: InstrumentId,
    source_path: &Path,
) -> DecodeSummary {
    let (global, regions) = group.into_parts();
    let region_count = regions.len();

    global.decode(store, FieldTarget::Instrument(instrument));
    suppress_default_modulators(store, instrument);

    let mut summary = DecodeSummary::default();
    for mut region in regions {
        let Some(sample) = region.text(Opcode::Sample).map(str::to_owned) else {
            summary.skipped_regions += 1;
            continue;
        };

        let mut samples = store.resolve_samples(&sample, instrument, source_path);
        if samples.is_empty() {
            log::warn!("region skipped: sample '{}' did not resolve", sample);
            summary.skipped_regions += 1;
            continue;
        }

        // Rebase the offset opcodes on the stored geometry before any
        // generator field is written.
        let info = store.sample_info(samples[0]);
        region.adapt_offsets(info.loop_start, info.loop_end, info.length);

        // A hard-panned stereo region collapses to the audible channel.
        if samples.len() == 2 {
            if let Some(pan) = region.real(Opcode::Pan) {
                if pan.abs() >= 99.9 {
                    if pan < 0.0 {
                        samples.remove(1);
                    } else {
                        samples.remove(0);
                    }
                }
            }
        }

        if samples.len() == 1 {
            let division = store.create_division(instrument);
            store.link_sample(division, samples[0]);
            region.decode(store, FieldTarget::Division(division));
            if let Some(pan) = region.real(Opcode::Pan) {
                store.set_division_field(
                    division,
                    GeneratorField::Pan,
                    FieldValue::Signed(units::clamp_pan(units::PAN_UNITS_PER_PERCENT * pan)),
                );
            }
            summary.divisions += 1;
        } else {
            summary.divisions += decode_stereo(&region, store, instrument, &samples);
        }
    }

    log::info!(
        "decoded {} region(s) into {} division(s), {} skipped",
        region_count,
        summary.divisions,
        summary.skipped_regions
    );
    summary
}

/// Split a true stereo region into a left and a right division.
///
/// The stereo image is synthesized in pan units: `width` spreads the two
/// divisions symmetrically (full spread 500 when the width opcode is
/// undefined), `position` then shifts the pair without exceeding what the
/// spread leaves, and a defined pan attenuates the channel opposite to
/// the pan direction.
fn decode_stereo<S: SoundFontStore>(
    region: &ParameterScope,
    store: &mut S,
    instrument: InstrumentId,
    samples: &[SampleId],
) -> usize {
    let width = match region.real(Opcode::Width) {
        Some(percent) => units::PAN_UNITS_PER_PERCENT * percent,
        None => 500.0,
    };
    let mut position = region.real(Opcode::Position).unwrap_or(0.0) / 100.0;
    position = position.signum() * (position * (500.0 - width.abs())).abs();

    let mut attenuation = 0.0;
    let mut attenuated_index = None;
    if let Some(pan) = region.real(Opcode::Pan) {
        attenuation = -units::percent_to_db(100.0 - pan.abs());
        if pan < 0.0 {
            attenuated_index = Some(1);
        } else if pan > 0.0 {
            attenuated_index = Some(0);
        }
    }

    for (index, &sample) in samples.iter().enumerate() {
        let division = store.create_division(instrument);
        store.link_sample(division, sample);

        if attenuated_index == Some(index) {
            store.set_division_field(
                division,
                GeneratorField::InitialAttenuation,
                FieldValue::Signed(units::db_to_attenuation(attenuation)),
            );
        }

        region.decode(store, FieldTarget::Division(division));

        let pan_units = if index == 0 {
            -width + position
        } else {
            width + position
        };
        store.set_division_field(
            division,
            GeneratorField::Pan,
            FieldValue::Signed(units::clamp_pan(pan_units)),
        );
    }
    samples.len()
}

/// Counter-write the target format's built-in default modulators.
///
/// There is no delete operation for them: the only way to cancel a
/// built-in is an explicit modulator over the same source/destination
/// pair with amount 0, a no-op secondary source and a linear transform.
/// Runs before any division is created so the override sits at
/// instrument level.
fn suppress_default_modulators<S: SoundFontStore>(store: &mut S, instrument: InstrumentId) {
    for default in DefaultModulator::ALL {
        let modulator = store.create_modulator(instrument);
        store.set_modulator_source(modulator, default.source());
        store.set_modulator_destination(modulator, default.destination());
        store.set_modulator_amount(modulator, 0);
        store.set_modulator_amount_source(modulator, ModSource::no_controller());
        store.set_modulator_transform(modulator, Transform::Linear);
    }
}
