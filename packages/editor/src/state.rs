//! # Decoration State
//!
//! Two committed decoration sets, updated once per transaction:
//!
//! ```text
//! marks    ── map ──► replace_all(built)                        (on rebuild)
//! replaces ── map ──► filter_by_selection(remapped, built, sel)  (always)
//! ```
//!
//! Marks are thrown away on every rebuild. Replaces are kept across
//! transactions and filtered, so the annotation under the caret is shown as
//! plain text while everything else stays hidden.

use crate::builder::DecorationRange;
use crate::changes::ChangeSet;
use crate::selection::Selection;

/// Decorations sorted by position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    ranges: Vec<DecorationRange>,
}

impl DecorationSet {
    /// Sort by position; entries sharing a span keep their order
    pub fn new(mut ranges: Vec<DecorationRange>) -> Self {
        ranges.sort_by_key(|d| (d.from, d.to));
        Self { ranges }
    }

    /// Sort and keep at most one entry per `from..to`; of two entries with
    /// the same span the earlier one wins
    pub fn merged(ranges: Vec<DecorationRange>) -> Self {
        let mut set = Self::new(ranges);
        set.ranges
            .dedup_by(|later, earlier| later.from == earlier.from && later.to == earlier.to);
        set
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecorationRange> {
        self.ranges.iter()
    }

    pub fn as_slice(&self) -> &[DecorationRange] {
        &self.ranges
    }

    /// Carry every decoration through a document change, dropping the ones
    /// whose text was removed
    pub fn map(&self, changes: &ChangeSet) -> Self {
        if changes.is_empty() {
            return self.clone();
        }

        let ranges = self
            .ranges
            .iter()
            .filter_map(|d| {
                let range = changes.map_range(&d.range())?;
                let anchor = changes.map_range(&d.anchor)?;
                Some(DecorationRange::new(range, anchor, d.decoration.clone()))
            })
            .collect();

        Self::new(ranges)
    }
}

/// One update to the decoration state
#[derive(Debug, Clone)]
pub struct Transaction {
    pub changes: ChangeSet,
    pub selection: Selection,
    /// Output of a rebuild, when one ran for this transaction
    pub rebuild: Option<Vec<DecorationRange>>,
}

impl Transaction {
    pub fn new(changes: ChangeSet, selection: Selection) -> Self {
        Self {
            changes,
            selection,
            rebuild: None,
        }
    }

    pub fn with_rebuild(mut self, built: Vec<DecorationRange>) -> Self {
        self.rebuild = Some(built);
        self
    }
}

/// The marks of a rebuild, replacing whatever was there. Several marks may
/// share a span when one syntax token ends more than one annotation.
pub fn replace_all(built: &[DecorationRange]) -> DecorationSet {
    DecorationSet::new(
        built
            .iter()
            .filter(|d| d.decoration.is_mark())
            .cloned()
            .collect(),
    )
}

/// Remapped replaces minus those the selection touches, plus the built
/// replaces it doesn't touch
pub fn filter_by_selection(
    remapped: &DecorationSet,
    built: Option<&[DecorationRange]>,
    selection: &Selection,
) -> DecorationSet {
    let fresh = built
        .unwrap_or_default()
        .iter()
        .filter(|d| d.decoration.is_replace());

    // Built entries go first so they win over remapped ones at the same span
    let ranges = fresh
        .chain(remapped.iter())
        .filter(|d| !selection.touches(&d.anchor))
        .cloned()
        .collect();

    DecorationSet::merged(ranges)
}

#[derive(Debug, Clone, Default)]
pub struct DecorationState {
    marks: DecorationSet,
    replaces: DecorationSet,
}

impl DecorationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marks(&self) -> &DecorationSet {
        &self.marks
    }

    pub fn replaces(&self) -> &DecorationSet {
        &self.replaces
    }

    pub fn apply(&mut self, transaction: &Transaction) {
        let marks = self.marks.map(&transaction.changes);
        let replaces = self.replaces.map(&transaction.changes);
        let built = transaction.rebuild.as_deref();

        self.marks = match built {
            Some(built) => replace_all(built),
            None => marks,
        };
        self.replaces = filter_by_selection(&replaces, built, &transaction.selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Decoration;
    use crate::changes::Change;
    use attrmark_parser::Attribute;
    use std::rc::Rc;

    fn replace(from: usize, to: usize) -> DecorationRange {
        DecorationRange::new(
            from..to,
            from..to,
            Rc::new(Decoration::Replace {
                raw: "{.x}".to_string(),
            }),
        )
    }

    fn mark(from: usize, to: usize) -> DecorationRange {
        DecorationRange::new(
            from..to,
            from..to,
            Rc::new(Decoration::Mark {
                attributes: Vec::new(),
            }),
        )
    }

    fn spans(set: &DecorationSet) -> Vec<(usize, usize)> {
        set.iter().map(|d| (d.from, d.to)).collect()
    }

    #[test]
    fn test_set_sorted_and_deduplicated() {
        let set = DecorationSet::merged(vec![replace(10, 14), replace(2, 6), replace(10, 14)]);
        assert_eq!(spans(&set), vec![(2, 6), (10, 14)]);

        let set = DecorationSet::new(vec![replace(10, 14), replace(2, 6), replace(10, 14)]);
        assert_eq!(spans(&set), vec![(2, 6), (10, 14), (10, 14)]);
    }

    #[test]
    fn test_marks_sharing_a_span_are_all_kept() {
        let first = DecorationRange::new(
            0..17,
            0..17,
            Rc::new(Decoration::Mark {
                attributes: vec![Attribute::new("class", "a")],
            }),
        );
        let second = DecorationRange::new(
            0..17,
            0..17,
            Rc::new(Decoration::Mark {
                attributes: vec![Attribute::new("class", "b")],
            }),
        );

        let mut state = DecorationState::new();
        state.apply(
            &Transaction::new(ChangeSet::empty(17), Selection::default())
                .with_rebuild(vec![first.clone(), second.clone()]),
        );
        assert_eq!(state.marks().as_slice(), &[first, second]);

        let changes = ChangeSet::single(17, Change::insert(0, 2)).unwrap();
        state.apply(&Transaction::new(changes, Selection::default()));
        assert_eq!(spans(state.marks()), vec![(2, 19), (2, 19)]);
    }

    #[test]
    fn test_replace_all_keeps_marks_only() {
        let set = replace_all(&[mark(0, 10), replace(6, 10)]);
        assert_eq!(spans(&set), vec![(0, 10)]);
    }

    #[test]
    fn test_filter_drops_touched_and_adds_untouched() {
        let remapped = DecorationSet::new(vec![replace(2, 6), replace(20, 24)]);
        let built = vec![replace(10, 14), replace(30, 34), mark(0, 34)];

        let set = filter_by_selection(&remapped, Some(&built), &Selection::cursor(21));
        assert_eq!(spans(&set), vec![(2, 6), (10, 14), (30, 34)]);

        let set = filter_by_selection(&remapped, Some(&built), &Selection::cursor(14));
        assert_eq!(spans(&set), vec![(2, 6), (20, 24), (30, 34)]);
    }

    #[test]
    fn test_filter_without_rebuild() {
        let remapped = DecorationSet::new(vec![replace(2, 6)]);
        assert!(filter_by_selection(&remapped, None, &Selection::cursor(4)).is_empty());
        assert_eq!(filter_by_selection(&remapped, None, &Selection::cursor(9)).len(), 1);
    }

    #[test]
    fn test_apply_remaps_through_changes() {
        let mut state = DecorationState::new();
        state.apply(
            &Transaction::new(ChangeSet::empty(40), Selection::cursor(0))
                .with_rebuild(vec![mark(10, 20), replace(16, 20)]),
        );

        let changes = ChangeSet::single(40, Change::insert(5, 3)).unwrap();
        state.apply(&Transaction::new(changes, Selection::cursor(8)));

        assert_eq!(spans(state.marks()), vec![(13, 23)]);
        assert_eq!(spans(state.replaces()), vec![(19, 23)]);
    }

    #[test]
    fn test_apply_drops_deleted_decorations() {
        let mut state = DecorationState::new();
        state.apply(
            &Transaction::new(ChangeSet::empty(40), Selection::cursor(0))
                .with_rebuild(vec![mark(10, 20), replace(16, 20)]),
        );

        let changes = ChangeSet::single(40, Change::delete(8, 22)).unwrap();
        state.apply(&Transaction::new(changes, Selection::cursor(30)));

        assert!(state.marks().is_empty());
        assert!(state.replaces().is_empty());
    }

    #[test]
    fn test_rebuild_replaces_marks() {
        let mut state = DecorationState::new();
        let empty = || ChangeSet::empty(40);

        state.apply(&Transaction::new(empty(), Selection::cursor(0)).with_rebuild(vec![mark(0, 5)]));
        state.apply(&Transaction::new(empty(), Selection::cursor(0)).with_rebuild(vec![mark(10, 15)]));

        assert_eq!(spans(state.marks()), vec![(10, 15)]);
    }
}
