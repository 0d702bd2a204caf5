//! The parameter group: one global scope plus the ordered region list.
//!
//! The group is where the two parameter models get reconciled. The source
//! format inherits by omission — a region parameter overrides the global
//! one, an undefined region parameter falls back to global — while the
//! target wants every division self-contained. The normalization passes
//! below push global defaults down into the regions (plainly, in pairs,
//! or gated on co-occurring siblings), apply the numeric corrections, and
//! prune regions whose samples cannot be resolved. Pass order matters:
//! later passes assume earlier ones completed (see
//! [`pipeline::normalize`](crate::pipeline::normalize) for the canonical
//! sequence).

use std::path::Path;

use sforzato_sf2::SoundFontStore;

use crate::opcode::{Opcode, KEYNUM_BASE_DEFAULT, MOD_GROUPS};
use crate::scope::ParameterScope;

/// One global scope and the ordered sequence of region scopes.
///
/// Region order determines decoding order, not priority. The group is
/// constructed from parsed input, mutated in place by the normalization
/// passes, consumed once by decode, then discarded.
#[derive(Clone, Debug, Default)]
pub struct ParameterGroup {
    global: ParameterScope,
    regions: Vec<ParameterScope>,
}

impl ParameterGroup {
    pub fn new(global: ParameterScope) -> Self {
        Self {
            global,
            regions: Vec::new(),
        }
    }

    /// Append a region scope; regions decode in insertion order.
    pub fn push_region(&mut self, region: ParameterScope) {
        self.regions.push(region);
    }

    pub fn global(&self) -> &ParameterScope {
        &self.global
    }

    pub fn global_mut(&mut self) -> &mut ParameterScope {
        &mut self.global
    }

    pub fn regions(&self) -> &[ParameterScope] {
        &self.regions
    }

    pub fn region_mut(&mut self, index: usize) -> &mut ParameterScope {
        &mut self.regions[index]
    }

    pub(crate) fn into_parts(self) -> (ParameterScope, Vec<ParameterScope>) {
        (self.global, self.regions)
    }

    /// Pass (a): copy every opcode defined in `other` but undefined in
    /// this group's global scope. Regions are untouched.
    ///
    /// Used to fold a file-level global into a section-level global
    /// before any per-region work begins.
    pub fn merge_global_undefined(&mut self, other: &ParameterScope) {
        self.global.merge_if_undefined(other);
    }

    /// Pass (b): distribute a key-number opcode together with its base
    /// opcode.
    ///
    /// Only acts when the key-number opcode is globally defined. Every
    /// region lacking the key-number opcode receives the global value;
    /// every region lacking the base opcode receives the global base
    /// value, or [`KEYNUM_BASE_DEFAULT`] when global does not define it.
    /// The key-number opcode never stays in global — decode reads it per
    /// region only. The base opcode stays.
    pub fn move_keynum_into_regions(&mut self, keynum: Opcode, base: Opcode) {
        let Some(keynum_value) = self.global.real(keynum) else {
            return;
        };
        let base_value = self.global.real(base).unwrap_or(KEYNUM_BASE_DEFAULT);
        for region in &mut self.regions {
            if !region.is_defined(keynum) {
                region.set_real(keynum, keynum_value);
            }
            if !region.is_defined(base) {
                region.set_real(base, base_value);
            }
        }
        self.global.remove(keynum);
    }

    /// Pass (c): move a single opcode from global into every region
    /// lacking it.
    ///
    /// The copy carries the value as-is — the tagged value type makes
    /// the per-kind copy exhaustive, so there is no unsupported-kind
    /// fallthrough. The opcode is removed from global afterward whether
    /// or not any region received it.
    pub fn move_opcode_into_regions(&mut self, opcode: Opcode) {
        if let Some(param) = self.global.get(opcode) {
            let value = param.value().clone();
            for region in &mut self.regions {
                if !region.is_defined(opcode) {
                    region.set(opcode, value.clone());
                }
            }
        }
        self.global.remove(opcode);
    }

    /// Pass (d): co-occurrence-gated migration of the grouped
    /// envelope/LFO opcodes.
    ///
    /// For each group in [`MOD_GROUPS`] and each region: a global value
    /// is only copied down when the region lacks it *and* already
    /// defines at least one other member of the same group. A global
    /// default never introduces a whole modulation family into a region
    /// that has no local override of it. Global keeps its values — they
    /// remain the template for the other regions.
    pub fn move_mod_opcodes_into_regions(&mut self) {
        for group in MOD_GROUPS {
            for region in &mut self.regions {
                for &opcode in group {
                    if region.is_defined(opcode) || !self.global.is_defined(opcode) {
                        continue;
                    }
                    let sibling_defined = group
                        .iter()
                        .any(|&other| other != opcode && region.is_defined(other));
                    if sibling_defined {
                        let value = self.global.get(opcode).map(|p| p.value().clone());
                        if let Some(value) = value {
                            region.set(opcode, value);
                        }
                    }
                }
            }
        }
    }

    /// Pass (e): add a decibel offset to the volume opcode of global and
    /// of every region independently.
    pub fn adjust_volume(&mut self, offset_db: f64) {
        self.global.adjust_volume(offset_db);
        for region in &mut self.regions {
            region.adjust_volume(offset_db);
        }
    }

    /// Pass (f): reconcile per-region fine tuning with the corrections
    /// embedded in the sample files, using the global fine tuning (0
    /// when undefined) as the per-region default.
    pub fn adjust_correction<S: SoundFontStore>(&mut self, store: &mut S, source_path: &Path) {
        let default_tune = self.global.integer(Opcode::TuningFine).unwrap_or(0);
        for region in &mut self.regions {
            region.adjust_correction(store, source_path, default_tune);
        }
    }

    /// Pass (g): compensate the volume for the tremolo depth.
    ///
    /// A volume LFO modulates around the base level; subtracting its
    /// absolute depth keeps the peaks from clipping. A region's own
    /// depth wins over the group-wide fallback; a zero correction writes
    /// nothing.
    pub fn adjust_modulation_volume(&mut self) {
        let mut fallback = 0.0;
        if let Some(depth) = self.global.integer(Opcode::VolumeLfoDepth) {
            fallback = f64::from(depth.abs());
            self.global.adjust_volume(-fallback);
        }
        for region in &mut self.regions {
            let correction = region
                .integer(Opcode::VolumeLfoDepth)
                .map(|depth| f64::from(depth.abs()))
                .unwrap_or(fallback);
            if correction != 0.0 {
                region.adjust_volume(-correction);
            }
        }
    }

    /// Pass (h): delete every region whose sample cannot be validated.
    ///
    /// Iterates in reverse index order so a deletion never shifts an
    /// entry that is still to be visited; surviving regions keep their
    /// relative order.
    pub fn prune_invalid_samples<S: SoundFontStore>(&mut self, store: &mut S, source_path: &Path) {
        for index in (0..self.regions.len()).rev() {
            if !self.regions[index].sample_valid(store, source_path) {
                log::warn!(
                    "dropping region {}: sample '{}' not found",
                    index,
                    self.regions[index].text(Opcode::Sample).unwrap_or("<none>")
                );
                self.regions.remove(index);
            }
        }
    }

    /// Pass (i), first half: clear filter combinations the target cannot
    /// express, in global and in every region.
    pub fn check_filter(&mut self) {
        self.global.check_filter();
        for region in &mut self.regions {
            region.check_filter();
        }
    }

    /// Pass (i), second half: fold filter key tracking away. The global
    /// scope is not nested; the regions are.
    pub fn check_key_tracked_filter(&mut self) {
        self.global.check_key_tracked_filter(false);
        for region in &mut self.regions {
            region.check_key_tracked_filter(true);
        }
    }

    /// Whether the group routes to percussion: both channel bounds
    /// defined in global and equal to 10. Regions inherit channel
    /// routing from global at this stage.
    pub fn is_channel_10(&self) -> bool {
        self.global.integer(Opcode::ChannelMin) == Some(10)
            && self.global.integer(Opcode::ChannelMax) == Some(10)
    }

    /// Maximum volume across global and all regions, an undefined
    /// volume counting as 0 dB.
    pub fn max_volume(&self) -> f64 {
        let mut max = self.global.real(Opcode::Volume).unwrap_or(0.0);
        for region in &self.regions {
            max = max.max(region.real(Opcode::Volume).unwrap_or(0.0));
        }
        max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::KEYNUM_PAIRS;
    use sforzato_sf2::{MemoryStore, RegisteredSample};

    fn sample_meta() -> RegisteredSample {
        RegisteredSample {
            channels: 1,
            loop_start: 0,
            loop_end: 10,
            length: 100,
            correction: 0,
        }
    }

    fn group_with_regions(count: usize) -> ParameterGroup {
        let mut group = ParameterGroup::new(ParameterScope::new());
        for _ in 0..count {
            group.push_region(ParameterScope::new());
        }
        group
    }

    #[test]
    fn merge_global_only_fills_gaps() {
        let mut group = group_with_regions(1);
        group.global_mut().set_real(Opcode::Volume, -3.0);

        let mut file_global = ParameterScope::new();
        file_global.set_real(Opcode::Volume, -9.0);
        file_global.set_integer(Opcode::TuningFine, 15);

        group.merge_global_undefined(&file_global);

        assert_eq!(group.global().real(Opcode::Volume), Some(-3.0));
        assert_eq!(group.global().integer(Opcode::TuningFine), Some(15));
        assert!(group.regions()[0].is_empty());
    }

    #[test]
    fn keynum_pass_distributes_pair_with_default_base() {
        let (keynum, base) = KEYNUM_PAIRS[0];

        let mut group = group_with_regions(3);
        group.global_mut().set_real(keynum, 42.0);
        // region 0 lacks both, region 1 has its own keynum, region 2 has
        // its own base
        group.region_mut(1).set_real(keynum, 7.0);
        group.region_mut(2).set_real(base, 0.25);

        group.move_keynum_into_regions(keynum, base);

        for region in group.regions() {
            assert!(region.is_defined(keynum));
            assert!(region.is_defined(base));
        }
        assert_eq!(group.regions()[0].real(keynum), Some(42.0));
        assert_eq!(group.regions()[0].real(base), Some(KEYNUM_BASE_DEFAULT));
        assert_eq!(group.regions()[1].real(keynum), Some(7.0));
        assert_eq!(group.regions()[2].real(base), Some(0.25));
        assert!(!group.global().is_defined(keynum));
        // the base opcode is left in global (here: undefined stays
        // undefined)
        assert!(!group.global().is_defined(base));
    }

    #[test]
    fn keynum_pass_uses_global_base_when_defined() {
        let (keynum, base) = KEYNUM_PAIRS[1];

        let mut group = group_with_regions(1);
        group.global_mut().set_real(keynum, 10.0);
        group.global_mut().set_real(base, 0.5);

        group.move_keynum_into_regions(keynum, base);

        assert_eq!(group.regions()[0].real(base), Some(0.5));
        assert!(group.global().is_defined(base));
        assert!(!group.global().is_defined(keynum));
    }

    #[test]
    fn keynum_pass_without_global_keynum_is_a_no_op() {
        let (keynum, base) = KEYNUM_PAIRS[2];

        let mut group = group_with_regions(1);
        group.global_mut().set_real(base, 0.5);
        group.move_keynum_into_regions(keynum, base);

        assert!(!group.regions()[0].is_defined(keynum));
        assert!(!group.regions()[0].is_defined(base));
        assert_eq!(group.global().real(base), Some(0.5));
    }

    #[test]
    fn single_opcode_migration_strips_global_and_fills_regions() {
        let mut group = group_with_regions(2);
        group.global_mut().set_real(Opcode::Pan, -30.0);
        group.region_mut(1).set_real(Opcode::Pan, 55.0);

        group.move_opcode_into_regions(Opcode::Pan);

        assert!(!group.global().is_defined(Opcode::Pan));
        assert_eq!(group.regions()[0].real(Opcode::Pan), Some(-30.0));
        assert_eq!(group.regions()[1].real(Opcode::Pan), Some(55.0));

        // running it again changes nothing
        let before: Vec<_> = group.regions().to_vec();
        group.move_opcode_into_regions(Opcode::Pan);
        assert_eq!(group.regions(), &before[..]);
    }

    #[test]
    fn single_opcode_migration_strips_global_even_without_regions_lacking_it() {
        let mut group = group_with_regions(1);
        group.global_mut().set_text(Opcode::LoopMode, "loop_continuous");
        group.region_mut(0).set_text(Opcode::LoopMode, "no_loop");

        group.move_opcode_into_regions(Opcode::LoopMode);

        assert!(!group.global().is_defined(Opcode::LoopMode));
        assert_eq!(group.regions()[0].text(Opcode::LoopMode), Some("no_loop"));
    }

    #[test]
    fn mod_migration_requires_a_defined_sibling() {
        let group_table = MOD_GROUPS[2]; // volume LFO family
        let head = group_table[0];
        let delay = group_table[1];
        let freq = group_table[2];

        let mut group = group_with_regions(2);
        group.global_mut().set_integer(head, -6);
        group.global_mut().set_real(freq, 5.5);

        // region 0 has a local delay: gate open for head and freq
        group.region_mut(0).set_real(delay, 0.1);
        // region 1 has nothing from the family: gate closed

        group.move_mod_opcodes_into_regions();

        assert_eq!(group.regions()[0].integer(head), Some(-6));
        assert_eq!(group.regions()[0].real(freq), Some(5.5));
        assert!(!group.regions()[1].is_defined(head));
        assert!(!group.regions()[1].is_defined(freq));

        // global keeps its values as a template
        assert_eq!(group.global().integer(head), Some(-6));
        assert_eq!(group.global().real(freq), Some(5.5));
    }

    #[test]
    fn mod_migration_concrete_gate_case() {
        // group {A, B, C} with global A defined, region defines B only:
        // A is copied, C stays undefined.
        let family = MOD_GROUPS[0];
        let a = family[0];
        let b = family[1];
        let c = family[2];

        let mut group = group_with_regions(1);
        group.global_mut().set_integer(a, 1200);
        group.region_mut(0).set_real(b, 0.02);

        group.move_mod_opcodes_into_regions();

        assert_eq!(group.regions()[0].integer(a), Some(1200));
        assert!(group.regions()[0].is_defined(b));
        assert!(!group.regions()[0].is_defined(c));
    }

    #[test]
    fn mod_migration_is_idempotent() {
        let family = MOD_GROUPS[3];
        let mut group = group_with_regions(1);
        group.global_mut().set_integer(family[0], 300);
        group.region_mut(0).set_real(family[1], 0.4);

        group.move_mod_opcodes_into_regions();
        let once: Vec<_> = group.regions().to_vec();
        group.move_mod_opcodes_into_regions();
        assert_eq!(group.regions(), &once[..]);
    }

    #[test]
    fn volume_adjustment_applies_everywhere_independently() {
        let mut group = group_with_regions(2);
        group.global_mut().set_real(Opcode::Volume, 2.0);
        group.region_mut(0).set_real(Opcode::Volume, -1.0);

        group.adjust_volume(-2.0);

        assert_eq!(group.global().real(Opcode::Volume), Some(0.0));
        assert_eq!(group.regions()[0].real(Opcode::Volume), Some(-3.0));
        assert_eq!(group.regions()[1].real(Opcode::Volume), Some(-2.0));
    }

    #[test]
    fn modulation_volume_compensation_prefers_region_depth() {
        let mut group = group_with_regions(3);
        group.global_mut().set_integer(Opcode::VolumeLfoDepth, -3);
        group.global_mut().set_real(Opcode::Volume, 0.0);

        group.region_mut(0).set_integer(Opcode::VolumeLfoDepth, 6);
        group.region_mut(1).set_real(Opcode::Volume, -1.0);
        // region 2 has neither: fallback applies to an undefined volume

        group.adjust_modulation_volume();

        assert_eq!(group.global().real(Opcode::Volume), Some(-3.0));
        assert_eq!(group.regions()[0].real(Opcode::Volume), Some(-6.0));
        assert_eq!(group.regions()[1].real(Opcode::Volume), Some(-4.0));
        assert_eq!(group.regions()[2].real(Opcode::Volume), Some(-3.0));
    }

    #[test]
    fn zero_modulation_depth_writes_nothing() {
        let mut group = group_with_regions(1);
        group.region_mut(0).set_integer(Opcode::VolumeLfoDepth, 0);

        group.adjust_modulation_volume();

        assert!(!group.global().is_defined(Opcode::Volume));
        assert!(!group.regions()[0].is_defined(Opcode::Volume));
    }

    #[test]
    fn pruning_preserves_surviving_order() {
        let mut store = MemoryStore::new();
        store.register_sample("a.wav", sample_meta()).unwrap();
        store.register_sample("c.wav", sample_meta()).unwrap();
        store.register_sample("e.wav", sample_meta()).unwrap();

        let mut group = group_with_regions(5);
        for (index, name) in ["a.wav", "b.wav", "c.wav", "d.wav", "e.wav"]
            .iter()
            .enumerate()
        {
            group.region_mut(index).set_text(Opcode::Sample, name);
        }

        group.prune_invalid_samples(&mut store, Path::new("/sfz"));

        let survivors: Vec<_> = group
            .regions()
            .iter()
            .map(|r| r.text(Opcode::Sample).unwrap().to_string())
            .collect();
        assert_eq!(survivors, vec!["a.wav", "c.wav", "e.wav"]);
    }

    #[test]
    fn region_without_sample_is_pruned() {
        let mut store = MemoryStore::new();
        let mut group = group_with_regions(1);
        group.region_mut(0).set_real(Opcode::Volume, -3.0);

        group.prune_invalid_samples(&mut store, Path::new("/sfz"));
        assert!(group.regions().is_empty());
    }

    #[test]
    fn correction_uses_global_default_and_file_metadata() {
        let mut store = MemoryStore::new();
        store
            .register_sample(
                "tuned.wav",
                RegisteredSample {
                    correction: 10,
                    ..sample_meta()
                },
            )
            .unwrap();
        store.register_sample("plain.wav", sample_meta()).unwrap();

        let mut group = group_with_regions(3);
        group.global_mut().set_integer(Opcode::TuningFine, 25);

        group.region_mut(0).set_text(Opcode::Sample, "tuned.wav");
        group.region_mut(1).set_text(Opcode::Sample, "plain.wav");
        group.region_mut(1).set_integer(Opcode::TuningFine, -25);
        // region 2: default tune cancelled exactly by the file correction
        group.region_mut(2).set_text(Opcode::Sample, "tuned.wav");
        group.region_mut(2).set_integer(Opcode::TuningFine, 10);

        group.adjust_correction(&mut store, Path::new("/sfz"));

        assert_eq!(group.regions()[0].integer(Opcode::TuningFine), Some(15));
        assert_eq!(group.regions()[1].integer(Opcode::TuningFine), Some(-25));
        assert!(!group.regions()[2].is_defined(Opcode::TuningFine));
    }

    #[test]
    fn channel_10_requires_both_bounds() {
        let mut group = group_with_regions(0);
        assert!(!group.is_channel_10());

        group.global_mut().set_integer(Opcode::ChannelMin, 10);
        assert!(!group.is_channel_10());

        group.global_mut().set_integer(Opcode::ChannelMax, 10);
        assert!(group.is_channel_10());

        group.global_mut().set_integer(Opcode::ChannelMax, 9);
        assert!(!group.is_channel_10());
    }

    #[test]
    fn max_volume_spans_global_and_regions() {
        let mut group = group_with_regions(2);
        group.global_mut().set_real(Opcode::Volume, 3.0);
        group.region_mut(0).set_real(Opcode::Volume, 1.0);
        group.region_mut(1).set_real(Opcode::Volume, 5.0);

        assert_eq!(group.max_volume(), 5.0);

        // undefined counts as 0
        let empty = group_with_regions(1);
        assert_eq!(empty.max_volume(), 0.0);
    }
}
