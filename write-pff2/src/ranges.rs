//! Sets of code point ranges, used to choose which glyphs are written

use std::{fmt::Display, ops::RangeInclusive};

/// An inclusive range of code points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterRange {
    start: u32,
    end: u32,
}

impl CharacterRange {
    /// Create the range covering `start` through `end`.
    ///
    /// The endpoints may be given in either order.
    pub fn new(start: u32, end: u32) -> Self {
        CharacterRange {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// A range covering exactly one code point.
    pub fn single(code_point: u32) -> Self {
        CharacterRange::new(code_point, code_point)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains(&self, code_point: u32) -> bool {
        (self.start..=self.end).contains(&code_point)
    }

    /// Returns `true` if the ranges overlap or are adjacent.
    pub fn is_combinable(&self, other: &CharacterRange) -> bool {
        self.start <= other.end.saturating_add(1) && other.start <= self.end.saturating_add(1)
    }

    /// The union of two ranges, if it is itself a range.
    pub fn combine(&self, other: &CharacterRange) -> Option<CharacterRange> {
        self.is_combinable(other).then(|| CharacterRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }
}

impl From<RangeInclusive<u32>> for CharacterRange {
    fn from(src: RangeInclusive<u32>) -> Self {
        CharacterRange::new(*src.start(), *src.end())
    }
}

impl Display for CharacterRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "0x{:X}", self.start)
        } else {
            write!(f, "0x{:X}-0x{:X}", self.start, self.end)
        }
    }
}

/// A set of code points, stored as disjoint ranges.
///
/// Ranges are merged as they are added, so the set never holds two ranges
/// that overlap or touch. An empty set is treated by the writer as "no
/// filter": see [`CharacterRangeSet::includes`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharacterRangeSet {
    // sorted by start; no two entries are combinable
    ranges: Vec<CharacterRange>,
}

impl CharacterRangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a range, merging it with any ranges it overlaps or touches.
    ///
    /// A single insertion may collapse several existing ranges into one.
    pub fn add(&mut self, range: impl Into<CharacterRange>) {
        let mut candidate = range.into();
        while let Some(pos) = self
            .ranges
            .iter()
            .position(|existing| existing.is_combinable(&candidate))
        {
            let existing = self.ranges.remove(pos);
            if let Some(merged) = existing.combine(&candidate) {
                candidate = merged;
            }
        }
        let pos = self
            .ranges
            .partition_point(|existing| existing.start < candidate.start);
        self.ranges.insert(pos, candidate);
    }

    /// Returns `true` if some range in the set contains `code_point`.
    pub fn contains(&self, code_point: u32) -> bool {
        let pos = self.ranges.partition_point(|range| range.end < code_point);
        self.ranges
            .get(pos)
            .is_some_and(|range| range.contains(code_point))
    }

    /// Returns `true` if a glyph for `code_point` should be written.
    ///
    /// Every code point is included when the set is empty.
    pub fn includes(&self, code_point: u32) -> bool {
        self.is_empty() || self.contains(code_point)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of disjoint ranges in the set.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Iterate over the ranges in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CharacterRange> + '_ {
        self.ranges.iter().copied()
    }
}

impl<R: Into<CharacterRange>> Extend<R> for CharacterRangeSet {
    fn extend<T: IntoIterator<Item = R>>(&mut self, iter: T) {
        iter.into_iter().for_each(|range| self.add(range))
    }
}

impl<R: Into<CharacterRange>> FromIterator<R> for CharacterRangeSet {
    fn from_iter<T: IntoIterator<Item = R>>(iter: T) -> Self {
        let mut set = CharacterRangeSet::new();
        set.extend(iter);
        set
    }
}
