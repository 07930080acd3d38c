//! # Change Sets
//!
//! A document edit expressed as replacements in pre-change coordinates, and
//! the position mapping that carries decorations across it.
//!
//! ## Mapping
//!
//! For each replacement of `from..to` by `insert` bytes:
//! - positions before `from` stay put
//! - positions after `to` shift by `insert - (to - from)`
//! - positions at `to` of a non-empty replacement land after the insertion
//! - other positions inside the replaced range (and insertion points) land
//!   before or after the insertion depending on [`Assoc`]
//!
//! A range whose content was entirely removed maps to `None`.

use crate::errors::ChangeError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Which side of an insertion a position sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

/// Replace `from..to` with `insert` bytes of new text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert: usize,
}

impl Change {
    pub fn insert(at: usize, len: usize) -> Self {
        Self {
            from: at,
            to: at,
            insert: len,
        }
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self { from, to, insert: 0 }
    }

    pub fn replace(from: usize, to: usize, insert: usize) -> Self {
        Self { from, to, insert }
    }

    fn delta(&self) -> isize {
        self.insert as isize - (self.to - self.from) as isize
    }
}

/// Ordered, non-overlapping changes against a document of known length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
    len: usize,
}

impl ChangeSet {
    /// Validate and build a change set; changes must be sorted and disjoint
    pub fn new(len: usize, changes: Vec<Change>) -> Result<Self, ChangeError> {
        let mut previous_end: Option<usize> = None;

        for change in &changes {
            if change.from > change.to {
                return Err(ChangeError::Inverted {
                    from: change.from,
                    to: change.to,
                });
            }
            if change.to > len {
                return Err(ChangeError::BeyondDocument {
                    from: change.from,
                    to: change.to,
                    len,
                });
            }
            if let Some(end) = previous_end {
                if change.from < end {
                    return Err(ChangeError::OutOfOrder { at: change.from });
                }
            }
            previous_end = Some(change.to);
        }

        Ok(Self { changes, len })
    }

    pub fn empty(len: usize) -> Self {
        Self {
            changes: Vec::new(),
            len,
        }
    }

    pub fn single(len: usize, change: Change) -> Result<Self, ChangeError> {
        Self::new(len, vec![change])
    }

    pub fn is_empty(&self) -> bool {
        self.changes.iter().all(|c| c.from == c.to && c.insert == 0)
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Document length before the changes
    pub fn old_len(&self) -> usize {
        self.len
    }

    /// Document length after the changes
    pub fn new_len(&self) -> usize {
        (self.len as isize + self.changes.iter().map(Change::delta).sum::<isize>()) as usize
    }

    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut delta: isize = 0;

        for change in &self.changes {
            if pos < change.from {
                break;
            }
            if pos > change.to {
                delta += change.delta();
                continue;
            }

            let start = (change.from as isize + delta) as usize;
            let after = start + change.insert;

            return if pos == change.to && change.from < change.to {
                after
            } else {
                match assoc {
                    Assoc::Before => start,
                    Assoc::After => after,
                }
            };
        }

        (pos as isize + delta) as usize
    }

    /// Map a range; the start sticks after insertions at its edge and the
    /// end sticks before them. `None` when the range's content is gone.
    pub fn map_range(&self, range: &Range<usize>) -> Option<Range<usize>> {
        let start = self.map_pos(range.start, Assoc::After);
        let end = self.map_pos(range.end, Assoc::Before);

        if range.start == range.end {
            let pos = self.map_pos(range.start, Assoc::Before);
            return Some(pos..pos);
        }
        if start >= end {
            return None;
        }
        Some(start..end)
    }

    /// Map a range so that it grows over insertions at its edges
    pub fn map_range_inclusive(&self, range: &Range<usize>) -> Range<usize> {
        let start = self.map_pos(range.start, Assoc::Before);
        let end = self.map_pos(range.end, Assoc::After).max(start);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_shifts_later_positions() {
        let set = ChangeSet::single(10, Change::insert(4, 3)).unwrap();
        assert_eq!(set.map_pos(2, Assoc::Before), 2);
        assert_eq!(set.map_pos(6, Assoc::Before), 9);
        assert_eq!(set.map_pos(4, Assoc::Before), 4);
        assert_eq!(set.map_pos(4, Assoc::After), 7);
        assert_eq!(set.new_len(), 13);
    }

    #[test]
    fn test_delete_collapses_inside() {
        let set = ChangeSet::single(10, Change::delete(2, 6)).unwrap();
        assert_eq!(set.map_pos(1, Assoc::After), 1);
        assert_eq!(set.map_pos(4, Assoc::Before), 2);
        assert_eq!(set.map_pos(4, Assoc::After), 2);
        assert_eq!(set.map_pos(6, Assoc::Before), 2);
        assert_eq!(set.map_pos(8, Assoc::Before), 4);
        assert_eq!(set.new_len(), 6);
    }

    #[test]
    fn test_range_fully_deleted_is_dropped() {
        let set = ChangeSet::single(20, Change::delete(5, 15)).unwrap();
        assert_eq!(set.map_range(&(6..10)), None);
        assert_eq!(set.map_range(&(5..15)), None);
        assert_eq!(set.map_range(&(0..7)), Some(0..5));
        assert_eq!(set.map_range(&(12..18)), Some(5..8));
    }

    #[test]
    fn test_range_with_replaced_content_is_dropped() {
        let set = ChangeSet::single(20, Change::replace(5, 10, 3)).unwrap();
        assert_eq!(set.map_range(&(5..10)), None);
    }

    #[test]
    fn test_insertion_at_edges_does_not_grow_range() {
        let set = ChangeSet::new(20, vec![Change::insert(5, 2), Change::insert(10, 2)]).unwrap();
        assert_eq!(set.map_range(&(5..10)), Some(7..12));
        assert_eq!(set.map_range_inclusive(&(5..10)), 5..14);
    }

    #[test]
    fn test_multiple_changes_accumulate() {
        let set = ChangeSet::new(30, vec![Change::delete(0, 5), Change::insert(10, 4)]).unwrap();
        assert_eq!(set.map_pos(20, Assoc::Before), 19);
        assert_eq!(set.map_range(&(12..14)), Some(11..13));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            ChangeSet::new(10, vec![Change::delete(5, 3)]),
            Err(ChangeError::Inverted { .. })
        ));
        assert!(matches!(
            ChangeSet::new(10, vec![Change::delete(5, 11)]),
            Err(ChangeError::BeyondDocument { .. })
        ));
        assert!(matches!(
            ChangeSet::new(10, vec![Change::delete(4, 6), Change::delete(5, 7)]),
            Err(ChangeError::OutOfOrder { .. })
        ));
        assert!(ChangeSet::empty(10).is_empty());
    }
}
