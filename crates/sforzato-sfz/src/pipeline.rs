//! The fixed-order normalization pipeline.
//!
//! The normalization passes on [`ParameterGroup`] depend on each other's
//! completion; this module owns the one correct sequence so callers
//! cannot reorder it. [`normalize`] takes the group by value and hands it
//! back self-contained: every opcode the decode engine consumes is then
//! either resolved per region or intentionally absent (meaning "use the
//! target-format default").

use std::path::Path;

use sforzato_sf2::SoundFontStore;

use crate::group::ParameterGroup;
use crate::opcode::{KEYNUM_PAIRS, REGION_ONLY_OPCODES};

/// Inputs of a normalization run.
#[derive(Clone, Copy, Debug)]
pub struct NormalizeOptions<'a> {
    /// Extra volume offset in dB applied on top of the headroom
    /// normalization (e.g. a global gain chosen by the caller).
    pub volume_offset: f64,
    /// Directory the source file lives in; sample references resolve
    /// against it.
    pub source_path: &'a Path,
}

impl<'a> NormalizeOptions<'a> {
    pub fn new(source_path: &'a Path) -> Self {
        Self {
            volume_offset: 0.0,
            source_path,
        }
    }
}

/// Run every normalization pass in its fixed order.
///
/// 1. Key-number pairs are distributed ([`KEYNUM_PAIRS`]).
/// 2. The per-region-only opcodes move out of global
///    ([`REGION_ONLY_OPCODES`]).
/// 3. Grouped envelope/LFO opcodes migrate, gated on co-occurrence.
/// 4. Volume headroom: the target expresses volume as attenuation only,
///    so when the loudest scope sits above 0 dB the whole group shifts
///    down by that maximum; the caller's extra offset is folded in.
/// 5. Fine tuning is reconciled with the sample files' own corrections.
/// 6. Tremolo depth is compensated in the volume.
/// 7. Regions without resolvable samples are pruned.
/// 8. Filter combinations the target cannot express are cleared.
pub fn normalize<S: SoundFontStore>(
    mut group: ParameterGroup,
    store: &mut S,
    options: NormalizeOptions<'_>,
) -> ParameterGroup {
    for (keynum, base) in KEYNUM_PAIRS {
        group.move_keynum_into_regions(keynum, base);
    }
    for opcode in REGION_ONLY_OPCODES {
        group.move_opcode_into_regions(opcode);
    }
    group.move_mod_opcodes_into_regions();

    let mut offset = options.volume_offset;
    let headroom = group.max_volume();
    if headroom > 0.0 {
        offset -= headroom;
    }
    if offset != 0.0 {
        group.adjust_volume(offset);
    }

    group.adjust_correction(store, options.source_path);
    group.adjust_modulation_volume();

    let before = group.regions().len();
    group.prune_invalid_samples(store, options.source_path);
    let after = group.regions().len();

    group.check_filter();
    group.check_key_tracked_filter();

    log::debug!(
        "normalized group: {} region(s) kept, {} pruned",
        after,
        before - after
    );
    group
}
