use crate::types::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// SelectionState
///
/// The user's selection over a filtered collection, as a discriminated
/// union: either an explicit include-list (`Manual`) or "everything
/// matching the filter except these" (`All`). Exactly one set exists per
/// mode, so the "both sets populated" class of bug cannot be represented.
///
/// Switching mode resets the selection. That reset is deliberate and
/// explicit: carrying an include-set into `All` mode (or an exclude-set
/// into `Manual`) would silently change its meaning.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionState {
    Manual { included: BTreeSet<RecordId> },
    All { excluded: BTreeSet<RecordId> },
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    /// A fresh selection: manual mode, nothing selected.
    #[must_use]
    pub const fn new() -> Self {
        Self::Manual {
            included: BTreeSet::new(),
        }
    }

    /// Flip one record's membership in the active set.
    ///
    /// Manual mode flips inclusion; all mode flips exclusion. Idempotent
    /// flip: toggling twice restores the prior state.
    pub fn toggle(&mut self, id: RecordId) {
        let set = match self {
            Self::Manual { included } => included,
            Self::All { excluded } => excluded,
        };

        if !set.remove(&id) {
            set.insert(id);
        }
    }

    /// Select everything matching the active filter. Clears both sets.
    pub fn select_all_matching(&mut self) {
        *self = Self::All {
            excluded: BTreeSet::new(),
        };
    }

    /// Reset to an empty manual selection. Clears both sets.
    pub fn clear_all(&mut self) {
        *self = Self::new();
    }

    /// Whether `id` is currently selected.
    ///
    /// `All` mode is relative to the active filter, so the caller supplies
    /// the membership check ("does this id match the filter right now").
    pub fn is_selected(&self, id: RecordId, matches_filter: impl FnOnce(RecordId) -> bool) -> bool {
        match self {
            Self::Manual { included } => included.contains(&id),
            Self::All { excluded } => !excluded.contains(&id) && matches_filter(id),
        }
    }

    /// Approximate selected count, given the caller's matching total.
    ///
    /// Advisory only: `matching_total` may be stale by display time, and the
    /// final bulk outcome's `attempted` count is the authoritative figure.
    #[must_use]
    pub fn estimated_count(&self, matching_total: u64) -> u64 {
        match self {
            Self::Manual { included } => included.len() as u64,
            Self::All { excluded } => matching_total.saturating_sub(excluded.len() as u64),
        }
    }

    #[must_use]
    pub const fn is_all_mode(&self) -> bool {
        matches!(self, Self::All { .. })
    }

    /// Size of the active set (include-set in manual mode, exclude-set in
    /// all mode).
    #[must_use]
    pub fn active_set_len(&self) -> usize {
        match self {
            Self::Manual { included } => included.len(),
            Self::All { excluded } => excluded.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u128) -> RecordId {
        RecordId::from_u128(n)
    }

    #[test]
    fn fresh_selection_is_empty_manual() {
        let state = SelectionState::new();

        assert!(!state.is_all_mode());
        assert_eq!(state.active_set_len(), 0);
        assert_eq!(state.estimated_count(100), 0);
    }

    #[test]
    fn toggle_tracks_inclusion_in_manual_mode() {
        let mut state = SelectionState::new();
        state.toggle(id(1));
        state.toggle(id(2));

        assert!(state.is_selected(id(1), |_| true));
        assert!(!state.is_selected(id(3), |_| true));
        assert_eq!(state.estimated_count(100), 2);
    }

    #[test]
    fn toggle_tracks_exclusion_in_all_mode() {
        let mut state = SelectionState::new();
        state.select_all_matching();
        state.toggle(id(1));

        assert!(!state.is_selected(id(1), |_| true));
        assert!(state.is_selected(id(2), |_| true));
        // Selection in all mode is relative to the filter.
        assert!(!state.is_selected(id(2), |_| false));
        assert_eq!(state.estimated_count(100), 99);
    }

    #[test]
    fn mode_switch_resets_selection() {
        let mut state = SelectionState::new();
        state.toggle(id(1));
        state.select_all_matching();

        assert_eq!(state.active_set_len(), 0);
        assert_eq!(state.estimated_count(50), 50);

        state.toggle(id(7));
        state.clear_all();

        assert_eq!(state, SelectionState::new());
    }

    #[test]
    fn estimated_count_saturates_on_stale_totals() {
        let mut state = SelectionState::new();
        state.select_all_matching();
        state.toggle(id(1));
        state.toggle(id(2));

        // A concurrent bulk delete can shrink the total below the exclude
        // count; the estimate floors at zero instead of wrapping.
        assert_eq!(state.estimated_count(1), 0);
    }

    #[test]
    fn wire_round_trip() {
        let mut state = SelectionState::new();
        state.select_all_matching();
        state.toggle(id(9));

        let json = serde_json::to_string(&state).expect("state should serialize");
        let back: SelectionState = serde_json::from_str(&json).expect("state should deserialize");

        assert_eq!(state, back);
    }

    // ─────────────────────────────────────────────────────────────
    // Properties
    // ─────────────────────────────────────────────────────────────

    #[derive(Clone, Debug)]
    enum Op {
        Toggle(u8),
        SelectAll,
        ClearAll,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u8>().prop_map(Op::Toggle),
            Just(Op::SelectAll),
            Just(Op::ClearAll),
        ]
    }

    fn apply(state: &mut SelectionState, op: &Op) {
        match op {
            Op::Toggle(n) => state.toggle(id(u128::from(*n))),
            Op::SelectAll => state.select_all_matching(),
            Op::ClearAll => state.clear_all(),
        }
    }

    proptest! {
        // After any op sequence, exactly one set is live; the other cannot
        // exist by construction, and the estimate stays consistent with the
        // active set.
        #[test]
        fn mode_invariant_holds(ops in prop::collection::vec(arb_op(), 0..64)) {
            let mut state = SelectionState::new();
            for op in &ops {
                apply(&mut state, op);
            }

            let total = 1_000u64;
            let estimate = state.estimated_count(total);
            match &state {
                SelectionState::Manual { included } => {
                    prop_assert_eq!(estimate, included.len() as u64);
                }
                SelectionState::All { excluded } => {
                    prop_assert_eq!(estimate, total - excluded.len() as u64);
                }
            }
        }

        // toggle(toggle(s, id), id) == s
        #[test]
        fn toggle_is_an_involution(
            ops in prop::collection::vec(arb_op(), 0..32),
            n in any::<u8>(),
        ) {
            let mut state = SelectionState::new();
            for op in &ops {
                apply(&mut state, op);
            }

            let before = state.clone();
            state.toggle(id(u128::from(n)));
            state.toggle(id(u128::from(n)));

            prop_assert_eq!(state, before);
        }

        // After select-all, estimate == total; excluding k distinct matching
        // ids drops it to total - k.
        #[test]
        fn select_all_then_exclude_arithmetic(ks in prop::collection::btree_set(any::<u8>(), 0..32)) {
            let mut state = SelectionState::new();
            state.select_all_matching();

            let total = 10_000u64;
            prop_assert_eq!(state.estimated_count(total), total);

            for k in &ks {
                state.toggle(id(u128::from(*k)));
            }

            prop_assert_eq!(state.estimated_count(total), total - ks.len() as u64);
        }
    }
}
