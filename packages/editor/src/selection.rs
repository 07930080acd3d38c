use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One selection range; `anchor == head` is a caret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Inclusive on both ends: a caret right before `{` or right after `}`
    /// counts as touching the span.
    pub fn touches(&self, span: &Range<usize>) -> bool {
        let (from, to) = (self.from(), self.to());
        let within = |pos: usize| pos >= span.start && pos <= span.end;

        within(from) || within(to) || (from <= span.start && to >= span.end)
    }
}

/// All selection ranges of a view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ranges: Vec<SelectionRange>,
}

impl Selection {
    pub fn new(ranges: Vec<SelectionRange>) -> Self {
        Self { ranges }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(vec![SelectionRange::cursor(pos)])
    }

    pub fn single(anchor: usize, head: usize) -> Self {
        Self::new(vec![SelectionRange::new(anchor, head)])
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    pub fn touches(&self, span: &Range<usize>) -> bool {
        self.ranges.iter().any(|range| range.touches(span))
    }
}
